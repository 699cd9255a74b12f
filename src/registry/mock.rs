use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use semver::Version;

use super::Registry;
use crate::domain::DistTag;
use crate::error::{PublishError, Result};

/// Registry operations, used to select which calls a [`MockRegistry`] fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOperation {
    SetVersion,
    Publish,
    AddDistTag,
    QueryDistTag,
    QueryName,
}

/// One recorded registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    SetVersion(Version),
    Publish(Vec<String>),
    AddDistTag {
        package: String,
        version: Version,
        tag: String,
    },
    QueryDistTag(String),
    QueryName,
}

/// Mock registry for testing without running npm
pub struct MockRegistry {
    name: String,
    dist_tags: RefCell<HashMap<String, Version>>,
    failing: HashSet<RegistryOperation>,
    calls: RefCell<Vec<RegistryCall>>,
}

impl MockRegistry {
    /// Create a mock for a package that has never been published
    pub fn new(name: impl Into<String>) -> Self {
        MockRegistry {
            name: name.into(),
            dist_tags: RefCell::new(HashMap::new()),
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make every call of `operation` fail with an external command error
    pub fn fail_on(mut self, operation: RegistryOperation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Pre-set a dist-tag
    pub fn with_dist_tag(self, tag: impl Into<String>, version: Version) -> Self {
        self.dist_tags.borrow_mut().insert(tag.into(), version);
        self
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.borrow().clone()
    }

    /// Current dist-tag pointers
    pub fn dist_tags(&self) -> HashMap<String, Version> {
        self.dist_tags.borrow().clone()
    }

    fn record(&self, operation: RegistryOperation, call: RegistryCall) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.contains(&operation) {
            return Err(PublishError::command(
                format!("mock {:?}", operation),
                "simulated registry failure",
                Some(1),
            ));
        }
        Ok(())
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new("mock-package")
    }
}

impl Registry for MockRegistry {
    fn set_version(&self, version: &Version) -> Result<()> {
        self.record(
            RegistryOperation::SetVersion,
            RegistryCall::SetVersion(version.clone()),
        )
    }

    fn publish(&self, tags: &[DistTag]) -> Result<()> {
        let labels: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        self.record(RegistryOperation::Publish, RegistryCall::Publish(labels))
    }

    fn add_dist_tag(&self, package: &str, version: &Version, tag: &DistTag) -> Result<()> {
        self.record(
            RegistryOperation::AddDistTag,
            RegistryCall::AddDistTag {
                package: package.to_string(),
                version: version.clone(),
                tag: tag.to_string(),
            },
        )?;
        self.dist_tags
            .borrow_mut()
            .insert(tag.to_string(), version.clone());
        Ok(())
    }

    fn query_dist_tag(&self, tag: &DistTag) -> Result<Option<Version>> {
        self.record(
            RegistryOperation::QueryDistTag,
            RegistryCall::QueryDistTag(tag.to_string()),
        )?;
        Ok(self.dist_tags.borrow().get(tag.as_str()).cloned())
    }

    fn query_name(&self) -> Result<String> {
        self.record(RegistryOperation::QueryName, RegistryCall::QueryName)?;
        Ok(self.name.clone())
    }
}
