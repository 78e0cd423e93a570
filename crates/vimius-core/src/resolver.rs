use crate::cache::{Catalog, ManifestCache};
use crate::closure::dependency_closure;
use crate::source::{FileSource, ManifestSource};
use crate::views::GroupedSubmodules;
use crate::CoreError;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::debug;
use vimius_schema::{GroupName, SubmoduleName, SubmoduleRecord};

/// Query API over the submodule manifest.
///
/// Constructed once with a manifest source and shared by reference. The
/// manifest is loaded on the first query and reused for every later one;
/// all returned records borrow from that cached copy.
#[derive(Debug)]
pub struct Submodules {
    cache: ManifestCache,
}

impl Submodules {
    pub fn new(source: impl ManifestSource + 'static) -> Self {
        Self {
            cache: ManifestCache::new(source),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    fn catalog(&self) -> Result<&Catalog, CoreError> {
        Ok(self.cache.catalog()?)
    }

    /// Every record, in manifest order.
    pub fn submodules(&self) -> Result<&[SubmoduleRecord], CoreError> {
        Ok(self.catalog()?.records())
    }

    pub fn submodule(&self, name: &str) -> Result<&SubmoduleRecord, CoreError> {
        self.catalog()?
            .get(name)
            .ok_or_else(|| CoreError::SubmoduleNotFound(name.to_owned()))
    }

    /// Transitive dependencies of `name`, excluding `name`, each listed once.
    pub fn dependencies(&self, name: &str) -> Result<Vec<SubmoduleName>, CoreError> {
        dependency_closure(self.catalog()?, name)
    }

    /// The record for `name` followed by the records of its closure.
    pub fn submodule_with_dependencies(
        &self,
        name: &str,
    ) -> Result<Vec<&SubmoduleRecord>, CoreError> {
        let catalog = self.catalog()?;
        let root = self.submodule(name)?;
        let closure = dependency_closure(catalog, name)?;

        let mut out = Vec::with_capacity(closure.len() + 1);
        out.push(root);
        for dep in &closure {
            out.push(self.submodule(dep)?);
        }
        Ok(out)
    }

    /// Records named in `active`, in manifest order.
    ///
    /// Names that match no record are skipped: the active list is user data
    /// and may lag behind the manifest.
    pub fn active<S: AsRef<str>>(&self, active: &[S]) -> Result<Vec<&SubmoduleRecord>, CoreError> {
        let catalog = self.catalog()?;
        let wanted: HashSet<&str> = active.iter().map(AsRef::as_ref).collect();

        for name in active.iter().map(AsRef::as_ref) {
            if !catalog.contains(name) {
                debug!("active submodule '{name}' is not in the manifest, skipping");
            }
        }

        Ok(catalog
            .records()
            .iter()
            .filter(|r| wanted.contains(r.name.as_str()))
            .collect())
    }

    /// Active records followed by any dependency of theirs that is not
    /// itself active. Every record appears once.
    pub fn active_with_dependencies<S: AsRef<str>>(
        &self,
        active: &[S],
    ) -> Result<Vec<&SubmoduleRecord>, CoreError> {
        let mut out = self.active(active)?;
        let mut seen: HashSet<&str> = out.iter().map(|r| r.name.as_str()).collect();

        let roots: Vec<&SubmoduleName> = out.iter().map(|r| &r.name).collect();
        let mut extra = Vec::new();
        for root in roots {
            for dep in self.dependencies(root)? {
                let record = self.submodule(&dep)?;
                if seen.insert(record.name.as_str()) {
                    extra.push(record);
                }
            }
        }
        out.extend(extra);
        Ok(out)
    }

    /// Distinct groups in first-seen order.
    pub fn groups(&self) -> Result<Vec<&GroupName>, CoreError> {
        let mut seen = HashSet::new();
        Ok(self
            .submodules()?
            .iter()
            .map(|r| &r.group)
            .filter(|g| seen.insert(g.as_str()))
            .collect())
    }

    pub fn submodules_by_group(&self) -> Result<GroupedSubmodules<'_>, CoreError> {
        Ok(GroupedSubmodules::from_records(self.submodules()?))
    }

    pub fn submodules_by_name(&self) -> Result<HashMap<&str, &SubmoduleRecord>, CoreError> {
        Ok(self
            .submodules()?
            .iter()
            .map(|r| (r.name.as_str(), r))
            .collect())
    }

    /// Records whose closure contains `name`, in manifest order.
    pub fn dependents(&self, name: &str) -> Result<Vec<&SubmoduleRecord>, CoreError> {
        self.submodule(name)?;
        let mut out = Vec::new();
        for record in self.submodules()? {
            if record.name == name {
                continue;
            }
            if self.dependencies(&record.name)?.iter().any(|d| d == name) {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Resolve every record's closure, surfacing the first dangling
    /// reference or cycle in manifest order.
    pub fn check(&self) -> Result<(), CoreError> {
        for record in self.submodules()? {
            self.dependencies(&record.name)?;
        }
        debug!("manifest check passed");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }
}
