//! Registry manifest data
//!
//! The manifest is the registry's `registry.json`: a map from component name
//! to a descriptor of what the component needs.
//!
//! ```json
//! {
//!   "dialog": {
//!     "kind": "ui-component",
//!     "internalDependencies": ["modal", "text"],
//!     "externalDependencies": ["react-native-reanimated"],
//!     "utilityFiles": []
//!   }
//! }
//! ```
//!
//! Names are kept as string keys because the registry is name-indexed data,
//! but every lookup goes through [`Manifest::get`], which fails with
//! [`ComponentryError::ComponentNotFound`] instead of returning a sentinel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ComponentryError, Result, component_not_found};

/// What a component is; decides where its file lands in the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    #[default]
    UiComponent,
    Hook,
    LibraryFile,
}

impl ComponentKind {
    /// Registry file extension used when a descriptor does not name its file
    fn default_extension(self) -> &'static str {
        match self {
            ComponentKind::UiComponent => "tsx",
            ComponentKind::Hook | ComponentKind::LibraryFile => "ts",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::UiComponent => "ui-component",
            ComponentKind::Hook => "hook",
            ComponentKind::LibraryFile => "library-file",
        }
    }
}

/// One installable component as declared by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Filled in from the manifest key
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub kind: ComponentKind,

    /// Other components this one imports, in declaration order
    #[serde(default, alias = "dependencies")]
    pub internal_dependencies: Vec<String>,

    /// Package identifiers the user has to install, passed through untouched
    #[serde(default)]
    pub external_dependencies: Vec<String>,

    /// Auxiliary files under the registry's `lib/` directory
    #[serde(default)]
    pub utility_files: Vec<String>,

    /// Registry file name, when it differs from `<name>.<ext>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComponentDescriptor {
    /// Create a descriptor with no dependencies
    #[allow(dead_code)] // used in tests
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            internal_dependencies: Vec::new(),
            external_dependencies: Vec::new(),
            utility_files: Vec::new(),
            file: None,
            description: None,
        }
    }

    /// File name of this component inside the registry and the project
    pub fn file_name(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.name, self.kind.default_extension()))
    }
}

/// The full registry manifest, keyed by component name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    components: BTreeMap<String, ComponentDescriptor>,
}

impl Manifest {
    /// Parse `registry.json` content
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, ComponentDescriptor> =
            serde_json::from_str(content).map_err(|e| ComponentryError::ManifestInvalid {
                reason: e.to_string(),
            })?;

        Self::from_components(raw.into_iter().map(|(name, mut descriptor)| {
            descriptor.name = name;
            descriptor
        }))
    }

    /// Build a manifest from descriptors, validating names
    pub fn from_components<I>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        let mut map = BTreeMap::new();
        for descriptor in components {
            validate_name(&descriptor.name)?;
            if let Some(file) = &descriptor.file {
                validate_relative_path(&descriptor.name, file)?;
            }
            for util in &descriptor.utility_files {
                validate_relative_path(&descriptor.name, util)?;
            }
            if map.contains_key(&descriptor.name) {
                return Err(ComponentryError::ManifestInvalid {
                    reason: format!("component '{}' is declared twice", descriptor.name),
                });
            }
            map.insert(descriptor.name.clone(), descriptor);
        }
        Ok(Self { components: map })
    }

    /// Look up a component, failing fast when the registry doesn't know it
    pub fn get(&self, name: &str) -> Result<&ComponentDescriptor> {
        self.components
            .get(name)
            .ok_or_else(|| component_not_found(name, self.names()))
    }

    #[allow(dead_code)] // used in tests
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// All component names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// All descriptors, sorted by name
    pub fn components(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Component names are lowercase words joined by single hyphens
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });

    if valid {
        Ok(())
    } else {
        Err(ComponentryError::ManifestInvalid {
            reason: format!("'{name}' is not a valid component name (expected lowercase-hyphenated)"),
        })
    }
}

/// Registry paths must stay inside the directory they are installed into
fn validate_relative_path(component: &str, path: &str) -> Result<()> {
    let escapes = path.starts_with('/')
        || path.starts_with('\\')
        || path.split(['/', '\\']).any(|segment| segment == "..");
    if path.is_empty() || escapes {
        return Err(ComponentryError::ManifestInvalid {
            reason: format!("component '{component}' declares an invalid path '{path}'"),
        });
    }
    Ok(())
}
