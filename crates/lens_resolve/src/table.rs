//! In-memory type model, loadable from JSON

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::TypeModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub returns: String,
    /// Parameter types; only zero-argument methods can appear in a path
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

/// Member declarations of one type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(default)]
    pub kind: TypeKind,
    /// Declared inside another type
    #[serde(default)]
    pub nested: bool,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    pub fn class() -> Self {
        Self::default()
    }

    pub fn interface() -> Self {
        Self { kind: TypeKind::Interface, ..Self::default() }
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn field(mut self, name: &str, ty: &str) -> Self {
        self.fields.push(FieldDef { name: name.to_string(), ty: ty.to_string(), is_static: false });
        self
    }

    pub fn static_field(mut self, name: &str, ty: &str) -> Self {
        self.fields.push(FieldDef { name: name.to_string(), ty: ty.to_string(), is_static: true });
        self
    }

    pub fn method(self, name: &str, returns: &str) -> Self {
        self.method_with_params(name, returns, &[])
    }

    pub fn method_with_params(mut self, name: &str, returns: &str, params: &[&str]) -> Self {
        self.methods.push(MethodDef {
            name: name.to_string(),
            returns: returns.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            is_static: false,
        });
        self
    }

    pub fn static_method(mut self, name: &str, returns: &str) -> Self {
        self.methods.push(MethodDef {
            name: name.to_string(),
            returns: returns.to_string(),
            params: Vec::new(),
            is_static: true,
        });
        self
    }
}

/// Type name → declarations. Types missing from the table are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeTable {
    #[serde(default)]
    pub types: BTreeMap<String, TypeDef>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: &str, def: TypeDef) -> Self {
        self.insert(name, def);
        self
    }

    pub fn insert(&mut self, name: &str, def: TypeDef) {
        self.types.insert(name.to_string(), def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

impl TypeModel for TypeTable {
    type Type = String;
    type Field = FieldDef;
    type Method = MethodDef;

    fn find_field(&self, ty: &String, name: &str) -> Option<FieldDef> {
        self.get(ty)?
            .fields
            .iter()
            .find(|f| !f.is_static && f.name == name)
            .cloned()
    }

    fn find_method(&self, ty: &String, name: &str) -> Option<MethodDef> {
        self.get(ty)?
            .methods
            .iter()
            .find(|m| !m.is_static && m.params.is_empty() && m.name == name)
            .cloned()
    }

    fn type_of_field(&self, field: &FieldDef) -> String {
        field.ty.clone()
    }

    fn type_of_method_return(&self, method: &MethodDef) -> String {
        method.returns.clone()
    }

    fn resolve_nested_type(&self, ty: &String) -> Option<String> {
        self.contains(ty).then(|| ty.clone())
    }

    /// Simple name: `com.acme.Person` → `Person`, `java.util.List<x.Y>` → `List<x.Y>`
    fn presentable_name(&self, ty: &String) -> String {
        let (base, args) = match ty.find('<') {
            Some(i) => ty.split_at(i),
            None => (ty.as_str(), ""),
        };
        let simple = base.rsplit('.').next().unwrap_or(base);
        format!("{}{}", simple, args)
    }

    fn is_lens_host(&self, ty: &String) -> bool {
        self.get(ty)
            .is_some_and(|def| def.kind == TypeKind::Class && !def.nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_json() {
        let json = r#"{
            "types": {
                "com.acme.Order": {
                    "fields": [
                        { "name": "total", "type": "java.math.BigDecimal" },
                        { "name": "COUNTER", "type": "int", "static": true }
                    ],
                    "methods": [
                        { "name": "customer", "returns": "com.acme.Customer" },
                        { "name": "line", "returns": "com.acme.Line", "params": ["int"] }
                    ]
                },
                "com.acme.Named": { "kind": "interface" },
                "com.acme.Order.Line": { "nested": true }
            }
        }"#;
        let table: TypeTable = serde_json::from_str(json).unwrap();
        let order = "com.acme.Order".to_string();

        assert!(table.find_field(&order, "total").is_some());
        assert!(table.find_field(&order, "COUNTER").is_none());
        assert!(table.find_method(&order, "customer").is_some());
        assert!(table.find_method(&order, "line").is_none());

        assert!(table.is_lens_host(&order));
        assert!(!table.is_lens_host(&"com.acme.Named".to_string()));
        assert!(!table.is_lens_host(&"com.acme.Order.Line".to_string()));
        assert!(!table.is_lens_host(&"com.acme.Unknown".to_string()));
    }

    #[test]
    fn test_unknown_types_are_opaque() {
        let table = TypeTable::new().with_type("A", TypeDef::class());
        assert_eq!(table.resolve_nested_type(&"A".to_string()), Some("A".to_string()));
        assert_eq!(table.resolve_nested_type(&"B".to_string()), None);
        assert!(table.find_field(&"B".to_string(), "x").is_none());
    }

    #[test]
    fn test_presentable_name() {
        let table = TypeTable::new();
        assert_eq!(table.presentable_name(&"com.acme.Person".to_string()), "Person");
        assert_eq!(table.presentable_name(&"Person".to_string()), "Person");
        assert_eq!(
            table.presentable_name(&"java.util.List<com.acme.Person>".to_string()),
            "List<com.acme.Person>"
        );
    }
}
