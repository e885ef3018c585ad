use clap::ValueEnum;

/// Orchestration platforms whose declarations can be discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Platform {
    Prefect,
    Airflow,
}

/// Syntactic markers that identify a platform's flow declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRules {
    /// Decorator name, e.g. `flow` for `@flow(...)` or `@prefect.flow(...)`.
    pub decorator: &'static str,
    /// Constructor name for `x = DAG(...)` style declarations, if any.
    pub constructor: Option<&'static str>,
    /// Keyword carrying the declared identifier.
    pub id_keyword: &'static str,
    /// Keyword carrying an explicit description, preferred over the docstring.
    pub description_keyword: &'static str,
}

const PREFECT_RULES: PlatformRules = PlatformRules {
    decorator: "flow",
    constructor: None,
    id_keyword: "name",
    description_keyword: "description",
};

const AIRFLOW_RULES: PlatformRules = PlatformRules {
    decorator: "dag",
    constructor: Some("DAG"),
    id_keyword: "dag_id",
    description_keyword: "description",
};

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Prefect => "prefect",
            Platform::Airflow => "airflow",
        }
    }

    pub fn rules(&self) -> &'static PlatformRules {
        match self {
            Platform::Prefect => &PREFECT_RULES,
            Platform::Airflow => &AIRFLOW_RULES,
        }
    }
}
