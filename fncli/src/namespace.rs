use std::collections::BTreeMap;

use crate::{function::Function, value::Value};

/**
The result of a successful parse: one value per argument, keyed by
parameter name.

In multi-command mode the namespace also records which command was
selected and the function it resolves to. Those live in their own fields,
so a parameter can be called `command` or `function` without clobbering
them.
*/
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    values: BTreeMap<String, Value>,
    command: Option<String>,
    function: Option<Function>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The selected command's name, in multi-command mode
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// The selected command's function, in multi-command mode
    #[must_use]
    pub fn function(&self) -> Option<&Function> {
        self.function.as_ref()
    }

    /// Record the selected command.
    pub fn select(&mut self, command: impl Into<String>, function: Function) {
        self.command = Some(command.into());
        self.function = Some(function);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_entries_do_not_collide() {
        let mut namespace = Namespace::new();
        namespace.insert("command", Value::from("not the command"));
        namespace.insert("function", Value::Int(3));

        let function = Function::new("token", Default::default(), |_| Ok(None));
        namespace.select("token", function);

        assert_eq!(namespace.command(), Some("token"));
        assert_eq!(namespace.function().map(Function::name), Some("token"));
        assert_eq!(namespace.get("command"), Some(&Value::from("not the command")));
        assert_eq!(namespace.get("function"), Some(&Value::Int(3)));
        assert_eq!(namespace.len(), 2);
    }
}
