//! Test registry.
//!
//! Tests are registered once, before the engine runs, and are executed in registration order.

use std::fmt;

use tally_core::store::{GrowableStore, GrowthPolicy, StoreError};

/// Group assigned to tests registered without one.
pub const DEFAULT_GROUP: &str = "Default";

/// A registered test body.
pub type TestFn = Box<dyn Fn() + 'static>;

/// One registered test: its body plus the metadata printed in reports.
pub struct TestDescriptor {
    func: TestFn,
    name: String,
    group: String,
    file: String,
    line: u32,
}

impl TestDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Source path as given at registration (used on diagnostic lines).
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Last path component of [`TestDescriptor::file`] (used in test headers).
    pub fn file_name(&self) -> &str {
        display_file_name(&self.file)
    }

    /// Line the test was registered on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Invoke the test body.
    pub fn call(&self) {
        (self.func)()
    }
}

impl fmt::Debug for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDescriptor")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("file", &self.file)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// Substring after the last path separator, or the whole path when there is none.
pub fn display_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Append-only, insertion-ordered list of registered tests.
#[derive(Debug, Default)]
pub struct Registry {
    tests: GrowableStore<TestDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            tests: GrowableStore::with_policy(policy),
        }
    }

    /// Register a test body.
    ///
    /// ## Parameters
    /// - `func`: the test body.
    /// - `name`: display name, usually the function identifier.
    /// - `group`: display group; `None` resolves to [`DEFAULT_GROUP`].
    /// - `line`, `file`: where the test was registered.
    ///
    /// ## Errors
    /// Fails only when the registry cannot grow.
    pub fn register(
        &mut self,
        func: impl Fn() + 'static,
        name: impl Into<String>,
        group: Option<&str>,
        line: u32,
        file: impl Into<String>,
    ) -> Result<(), StoreError> {
        let descriptor = TestDescriptor {
            func: Box::new(func),
            name: name.into(),
            group: group.unwrap_or(DEFAULT_GROUP).to_string(),
            file: file.into(),
            line,
        };
        tracing::debug!(
            test = %descriptor.name,
            group = %descriptor.group,
            file = %descriptor.file,
            line,
            "registering test"
        );
        self.tests.append(descriptor)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TestDescriptor> {
        self.tests.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestDescriptor> {
        self.tests.iter()
    }

    /// Drop every descriptor and free the backing storage.
    pub fn release(&mut self) {
        self.tests.release();
    }
}
