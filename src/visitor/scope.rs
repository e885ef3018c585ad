/// Kind of the innermost lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
}

/// Lexical context threaded through the traversal.
///
/// Each nested class or function gets its own copy, so leaving a scope
/// needs no bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'a> {
    pub kind: ScopeKind,
    /// Nearest enclosing class, if any.
    pub class: Option<&'a str>,
    /// Nearest enclosing function, if any.
    pub function: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn module() -> Self {
        Self {
            kind: ScopeKind::Module,
            class: None,
            function: None,
        }
    }

    pub fn enter_class(&self, name: &'a str) -> Self {
        Self {
            kind: ScopeKind::Class,
            class: Some(name),
            function: self.function,
        }
    }

    pub fn enter_function(&self, name: &'a str) -> Self {
        Self {
            kind: ScopeKind::Function,
            class: self.class,
            function: Some(name),
        }
    }

    pub fn in_function(&self) -> bool {
        self.kind == ScopeKind::Function
    }

    pub fn in_class_body(&self) -> bool {
        self.kind == ScopeKind::Class
    }
}

impl Default for Scope<'_> {
    fn default() -> Self {
        Self::module()
    }
}
