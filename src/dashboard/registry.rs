use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dashboard::{Application, ApplicationDescriptor, HostError, PathParseError};

/// Stable identity of a registered application: `(category, name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppPath {
    category: String,
    name: String,
}

impl AppPath {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AppPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.name)
    }
}

/// Parses `category:name`, also accepting the deep-link form `page=category:name`
impl FromStr for AppPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PathParseError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let value = trimmed.strip_prefix("page=").unwrap_or(trimmed);
        let (category, name) = value.split_once(':').ok_or_else(invalid)?;
        let (category, name) = (category.trim(), name.trim());

        if category.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(AppPath::new(category, name))
    }
}

struct Category {
    name: String,
    entries: Vec<ApplicationDescriptor>,
}

/// Static lookup table of every application, built once at boot.
///
/// Category order and in-category order are display order and are kept
/// exactly as given; nothing is sorted.
pub struct Registry {
    categories: Vec<Category>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds the registry from ordered `(category, [(name, instance)])` groups.
    /// A category named twice is merged into its first position.
    pub fn from_groups(
        groups: Vec<(String, Vec<(String, Box<dyn Application>)>)>,
    ) -> Result<Self, HostError> {
        let mut categories: Vec<Category> = Vec::new();

        for (category_name, apps) in groups {
            let index = match categories.iter().position(|c| c.name == category_name) {
                Some(index) => index,
                None => {
                    categories.push(Category {
                        name: category_name.clone(),
                        entries: Vec::new(),
                    });
                    categories.len() - 1
                }
            };

            for (name, instance) in apps {
                let path = AppPath::new(category_name.clone(), name);
                if categories.iter().flat_map(|c| &c.entries).any(|d| d.path() == &path) {
                    return Err(HostError::DuplicatePath(path));
                }
                debug!("Registered application {}", path);
                categories[index]
                    .entries
                    .push(ApplicationDescriptor::new(path, instance));
            }
        }

        Ok(Self { categories })
    }

    pub fn lookup(&self, path: &AppPath) -> Result<&ApplicationDescriptor, HostError> {
        self.descriptors()
            .find(|d| d.path() == path)
            .ok_or_else(|| HostError::NotFound(path.clone()))
    }

    pub fn lookup_mut(&mut self, path: &AppPath) -> Result<&mut ApplicationDescriptor, HostError> {
        self.descriptors_mut()
            .find(|d| d.path() == path)
            .ok_or_else(|| HostError::NotFound(path.clone()))
    }

    pub fn contains(&self, path: &AppPath) -> bool {
        self.lookup(path).is_ok()
    }

    /// Every path in construction order, for navigation menus
    pub fn flattened_paths(&self) -> Vec<AppPath> {
        self.descriptors().map(|d| d.path().clone()).collect()
    }

    pub fn first_path(&self) -> Option<AppPath> {
        self.descriptors().next().map(|d| d.path().clone())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    pub(crate) fn descriptors_mut(&mut self) -> impl Iterator<Item = &mut ApplicationDescriptor> {
        self.categories.iter_mut().flat_map(|c| c.entries.iter_mut())
    }
}

/// Builder for Registry
pub struct RegistryBuilder {
    groups: Vec<(String, Vec<(String, Box<dyn Application>)>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn category(
        mut self,
        name: impl Into<String>,
        apps: Vec<(&str, Box<dyn Application>)>,
    ) -> Self {
        let apps = apps
            .into_iter()
            .map(|(name, instance)| (name.to_string(), instance))
            .collect();
        self.groups.push((name.into(), apps));
        self
    }

    pub fn build(self) -> Result<Registry, HostError> {
        Registry::from_groups(self.groups)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
