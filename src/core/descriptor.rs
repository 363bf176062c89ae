//! Build descriptors - the resolved output for one module under one context.
//!
//! A descriptor is produced once by the resolver and never mutated. All
//! collections are either declared-order lists or ordered maps, so the
//! serialized form is byte-identical for identical inputs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::declaration::{options, DependencyKind, OptionValue};
use crate::util::hash::Fingerprint;

/// Fully resolved dependency lists, definitions and options for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    module: String,
    public_include_paths: Vec<String>,
    public_dependencies: Vec<String>,
    private_dependencies: Vec<String>,
    dynamic_dependencies: Vec<String>,
    definitions: BTreeMap<String, String>,
    options: BTreeMap<String, OptionValue>,
}

impl BuildDescriptor {
    pub(crate) fn new(
        module: String,
        public_include_paths: Vec<String>,
        [public_dependencies, private_dependencies, dynamic_dependencies]: [Vec<String>; 3],
        definitions: BTreeMap<String, String>,
        options: BTreeMap<String, OptionValue>,
    ) -> Self {
        BuildDescriptor {
            module,
            public_include_paths,
            public_dependencies,
            private_dependencies,
            dynamic_dependencies,
            definitions,
            options,
        }
    }

    /// Name of the module this descriptor was resolved for.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn public_include_paths(&self) -> &[String] {
        &self.public_include_paths
    }

    /// Final dependency list of one kind, in first-occurrence order.
    pub fn dependencies(&self, kind: DependencyKind) -> &[String] {
        match kind {
            DependencyKind::Public => &self.public_dependencies,
            DependencyKind::Private => &self.private_dependencies,
            DependencyKind::Dynamic => &self.dynamic_dependencies,
        }
    }

    pub fn public_dependencies(&self) -> &[String] {
        &self.public_dependencies
    }

    pub fn private_dependencies(&self) -> &[String] {
        &self.private_dependencies
    }

    pub fn dynamic_dependencies(&self) -> &[String] {
        &self.dynamic_dependencies
    }

    /// Every dependency, public first, then private, then dynamic.
    pub fn all_dependencies(&self) -> impl Iterator<Item = (DependencyKind, &str)> {
        DependencyKind::ALL.into_iter().flat_map(move |kind| {
            self.dependencies(kind)
                .iter()
                .map(move |name| (kind, name.as_str()))
        })
    }

    pub fn definitions(&self) -> &BTreeMap<String, String> {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert include paths to compiler flag format.
    pub fn include_flags(&self) -> Vec<String> {
        self.public_include_paths
            .iter()
            .map(|path| format!("-I{}", path))
            .collect()
    }

    /// Convert definitions to compiler flag format.
    pub fn definition_flags(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|(name, value)| format!("-D{}={}", name, value))
            .collect()
    }

    /// Compiler switches for options that map directly onto one.
    ///
    /// Options such as PCH usage or unity batching configure the driver, not
    /// the compiler, and are left to the options map.
    pub fn compile_switches(&self) -> Vec<String> {
        let mut switches = Vec::new();

        if let Some(rtti) = self.option(options::RTTI).and_then(OptionValue::as_bool) {
            switches.push(if rtti { "-frtti" } else { "-fno-rtti" }.to_string());
        }

        if let Some(exceptions) = self
            .option(options::EXCEPTIONS)
            .and_then(OptionValue::as_bool)
        {
            switches.push(
                if exceptions {
                    "-fexceptions"
                } else {
                    "-fno-exceptions"
                }
                .to_string(),
            );
        }

        switches
    }

    /// Stable content hash, suitable as a cache key.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.module);
        fp.update_list(&self.public_include_paths);
        for kind in DependencyKind::ALL {
            fp.update_str(kind.as_str());
            fp.update_list(self.dependencies(kind));
        }
        fp.update_len(self.definitions.len());
        for (name, value) in &self.definitions {
            fp.update_str(name).update_str(value);
        }
        fp.update_len(self.options.len());
        for (name, value) in &self.options {
            fp.update_str(name)
                .update_str(value.type_name())
                .update_str(&value.to_string());
        }
        fp.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildDescriptor {
        let mut definitions = BTreeMap::new();
        definitions.insert("WITH_TOOLS".to_string(), "1".to_string());
        definitions.insert("API_VERSION".to_string(), "3".to_string());

        let mut opts = BTreeMap::new();
        opts.insert(options::RTTI.to_string(), OptionValue::Bool(false));
        opts.insert(options::EXCEPTIONS.to_string(), OptionValue::Bool(true));
        opts.insert(options::UNITY.to_string(), OptionValue::Bool(false));

        BuildDescriptor::new(
            "Game".to_string(),
            vec!["Game/Public".to_string()],
            [
                vec!["Core".to_string(), "Engine".to_string()],
                vec!["RHI".to_string()],
                vec!["OnlineSubsystem".to_string()],
            ],
            definitions,
            opts,
        )
    }

    #[test]
    fn test_definition_flags_are_name_ordered() {
        assert_eq!(
            sample().definition_flags(),
            vec!["-DAPI_VERSION=3", "-DWITH_TOOLS=1"]
        );
    }

    #[test]
    fn test_compile_switches() {
        assert_eq!(sample().compile_switches(), vec!["-fno-rtti", "-fexceptions"]);
    }

    #[test]
    fn test_all_dependencies_order() {
        let desc = sample();
        let all: Vec<_> = desc.all_dependencies().collect();
        assert_eq!(
            all,
            vec![
                (DependencyKind::Public, "Core"),
                (DependencyKind::Public, "Engine"),
                (DependencyKind::Private, "RHI"),
                (DependencyKind::Dynamic, "OnlineSubsystem"),
            ]
        );
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["module"], "Game");
        assert_eq!(value["private_dependencies"][0], "RHI");
        assert_eq!(value["definitions"]["WITH_TOOLS"], "1");
        assert_eq!(value["options"]["rtti"], false);
    }

    #[test]
    fn test_toml_rendering() {
        let toml = sample().to_toml().unwrap();
        assert!(toml.contains("module = \"Game\""));
        assert!(toml.contains("[definitions]"));
        assert!(toml.contains("WITH_TOOLS = \"1\""));
    }

    #[test]
    fn test_fingerprint_distinguishes_option_types() {
        let a = sample();
        let mut opts = a.options().clone();
        opts.insert("level".to_string(), OptionValue::Integer(1));
        let b = BuildDescriptor::new(
            a.module().to_string(),
            a.public_include_paths().to_vec(),
            [
                a.public_dependencies().to_vec(),
                a.private_dependencies().to_vec(),
                a.dynamic_dependencies().to_vec(),
            ],
            a.definitions().clone(),
            opts.clone(),
        );
        opts.insert("level".to_string(), OptionValue::Text("1".to_string()));
        let c = BuildDescriptor::new(
            a.module().to_string(),
            a.public_include_paths().to_vec(),
            [
                a.public_dependencies().to_vec(),
                a.private_dependencies().to_vec(),
                a.dynamic_dependencies().to_vec(),
            ],
            a.definitions().clone(),
            opts,
        );

        assert_eq!(a.fingerprint(), sample().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(b.fingerprint(), c.fingerprint());
    }

    fn with_definitions(pairs: &[(&str, &str)]) -> BuildDescriptor {
        let definitions = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        BuildDescriptor::new(
            "Game".to_string(),
            Vec::new(),
            [Vec::new(), Vec::new(), Vec::new()],
            definitions,
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_fingerprint_separates_embedded_nul() {
        let packed = with_definitions(&[("A", "1\0B\02")]);
        let split = with_definitions(&[("A", "1"), ("B", "2")]);

        assert_ne!(packed, split);
        assert_ne!(packed.fingerprint(), split.fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_definitions_from_options() {
        let defined = with_definitions(&[("rtti", "false")]);
        let mut opts = BTreeMap::new();
        opts.insert("rtti".to_string(), OptionValue::Bool(false));
        let optioned = BuildDescriptor::new(
            "Game".to_string(),
            Vec::new(),
            [Vec::new(), Vec::new(), Vec::new()],
            BTreeMap::new(),
            opts,
        );

        assert_ne!(defined.fingerprint(), optioned.fingerprint());
    }
}
