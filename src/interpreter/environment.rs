use indexmap::IndexMap;
use std::rc::Rc;

use crate::ast::FunctionDef;
use crate::value::Value;

/// The variable mapping. Insertion-ordered so dumps of a run are reproducible.
pub type Scope = IndexMap<String, Value>;

/// All state a running program can touch: one flat variable mapping plus the
/// function table. There is no block scoping; function calls emulate a local scope
/// with [`Environment::snapshot`] and [`Environment::restore`].
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: Scope,
    functions: IndexMap<String, Rc<FunctionDef>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites a variable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &Scope {
        &self.variables
    }

    /// A full copy of the variable mapping.
    pub fn snapshot(&self) -> Scope {
        self.variables.clone()
    }

    /// Replaces the variable mapping wholesale. Functions are left untouched.
    pub fn restore(&mut self, snapshot: Scope) {
        self.variables = snapshot;
    }

    pub fn define_function(&mut self, function: Rc<FunctionDef>) {
        self.functions.insert(function.name.to_string(), function);
    }

    pub fn function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).cloned()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let mut env = Environment::new();
        env.set("x", Value::Number(42.0));
        assert_eq!(env.get("x"), Some(&Value::Number(42.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut env = Environment::new();
        env.set("x", Value::Number(1.0));
        env.set("x", Value::string("one"));
        assert_eq!(env.get("x"), Some(&Value::string("one")));
        assert_eq!(env.variables().len(), 1);
    }

    #[test]
    fn test_snapshot_restore_discards_changes() {
        let mut env = Environment::new();
        env.set("x", Value::Number(1.0));

        let saved = env.snapshot();
        env.set("x", Value::Number(99.0));
        env.set("local", Value::Bool(true));
        env.restore(saved);

        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(env.get("local"), None);
    }

    #[test]
    fn test_functions_survive_restore() {
        let mut env = Environment::new();
        let saved = env.snapshot();
        env.define_function(Rc::new(FunctionDef {
            name: Rc::from("greet"),
            params: vec![],
            body: vec![],
        }));
        env.restore(saved);

        assert!(env.function("greet").is_some());
        assert_eq!(env.function_names().collect::<Vec<_>>(), vec!["greet"]);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut env = Environment::new();
        env.set("b", Value::Number(1.0));
        env.set("a", Value::Number(2.0));
        let names: Vec<&String> = env.variables().keys().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
