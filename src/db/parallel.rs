//! One database per rank plus an automatically maintained master file.
//!
//! Every rank writes its blocks to `{path}-{rank:05}.silo`. The first rank
//! of the group also creates `{path}.silo`, and for each mesh or variable
//! written adds a multi-block entry naming the matching object in every
//! rank file (`{rank file}:{name}`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::CreateOptions;
use super::file::{DefVar, DbFile};
use super::library::initialize;
use crate::array::ArrayView;
use crate::native::{Centering, CoordType, NativeLibrary, ObjectType};
use crate::options::OptionList;
use crate::util::{Error, Result};

/// Path of the data file written by `rank`.
pub fn rank_path(path: impl AsRef<Path>, rank: usize) -> PathBuf {
    PathBuf::from(format!("{}-{:05}.silo", path.as_ref().display(), rank))
}

/// Path of the master file.
pub fn master_path(path: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(format!("{}.silo", path.as_ref().display()))
}

struct Master {
    file: DbFile,
    rank_files: Vec<String>,
}

impl Master {
    /// `{rank file}:{name}` for every rank.
    fn block_names(&self, name: &str) -> Vec<String> {
        self.rank_files.iter().map(|rf| format!("{rf}:{name}")).collect()
    }

    fn add_mesh(&mut self, name: &str, kind: ObjectType, optlist: Option<&OptionList>) -> Result<()> {
        let names = self.block_names(name);
        let blocks: Vec<(&str, ObjectType)> = names.iter().map(|n| (n.as_str(), kind)).collect();
        self.file.put_multimesh(name, &blocks, optlist)
    }

    fn add_variable(&mut self, name: &str, kind: ObjectType, optlist: Option<&OptionList>) -> Result<()> {
        let names = self.block_names(name);
        let blocks: Vec<(&str, ObjectType)> = names.iter().map(|n| (n.as_str(), kind)).collect();
        self.file.put_multivar(name, &blocks, optlist)
    }
}

/// Per-rank database of a parallel run.
///
/// Construct one on every rank. Calls are forwarded to the rank's data
/// file; on the master rank the master file is kept in step.
pub struct ParallelDbFile {
    rank: usize,
    data: DbFile,
    master: Option<Master>,
}

impl ParallelDbFile {
    /// Create the files for `rank` out of `ranks` with the default library.
    /// The first entry of `ranks` writes the master file.
    pub fn create(path: impl AsRef<Path>, rank: usize, ranks: &[usize], options: &CreateOptions) -> Result<Self> {
        Self::create_with(initialize(), path, rank, ranks, options)
    }

    pub fn create_with(
        library: Arc<dyn NativeLibrary>,
        path: impl AsRef<Path>,
        rank: usize,
        ranks: &[usize],
        options: &CreateOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !ranks.contains(&rank) {
            return Err(Error::other(format!("rank {rank} is not one of {ranks:?}")));
        }

        let data = DbFile::create_with(library.clone(), rank_path(path, rank), options)?;
        let master = if ranks.first() == Some(&rank) {
            let file = DbFile::create_with(library, master_path(path), options)?;
            let rank_files = ranks
                .iter()
                .map(|&r| rank_path(path, r).display().to_string())
                .collect();
            tracing::debug!(path = %path.display(), nranks = ranks.len(), "master file created");
            Some(Master { file, rank_files })
        } else {
            None
        };

        Ok(Self { rank, data, master })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// True on the rank that writes the master file.
    pub fn is_master(&self) -> bool {
        self.master.is_some()
    }

    /// This rank's data file.
    pub fn data_file(&mut self) -> &mut DbFile {
        &mut self.data
    }

    /// The master file, on the master rank only.
    pub fn master_file(&mut self) -> Option<&mut DbFile> {
        self.master.as_mut().map(|m| &mut m.file)
    }

    /// Close the data file and, on the master rank, the master file.
    pub fn close(&mut self) -> Result<()> {
        let data = self.data.close();
        let master = match self.master.as_mut() {
            Some(m) => m.file.close(),
            None => Ok(()),
        };
        data.and(master)
    }

    fn added_mesh(&mut self, name: &str, kind: ObjectType, optlist: Option<&OptionList>) -> Result<()> {
        match self.master.as_mut() {
            Some(m) => m.add_mesh(name, kind, optlist),
            None => Ok(()),
        }
    }

    fn added_variable(&mut self, name: &str, kind: ObjectType, optlist: Option<&OptionList>) -> Result<()> {
        match self.master.as_mut() {
            Some(m) => m.add_variable(name, kind, optlist),
            None => Ok(()),
        }
    }

    pub fn put_zonelist(
        &mut self,
        name: &str,
        nzones: usize,
        ndims: usize,
        nodelist: &[i32],
        shapesize: &[i32],
        shapecounts: &[i32],
    ) -> Result<()> {
        self.data.put_zonelist(name, nzones, ndims, nodelist, shapesize, shapecounts)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn put_zonelist_2(
        &mut self,
        name: &str,
        nzones: usize,
        ndims: usize,
        nodelist: &[i32],
        lo_offset: i32,
        hi_offset: i32,
        shapetype: &[i32],
        shapesize: &[i32],
        shapecounts: &[i32],
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_zonelist_2(
            name, nzones, ndims, nodelist, lo_offset, hi_offset, shapetype, shapesize, shapecounts, optlist,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn put_ucdmesh<'a>(
        &mut self,
        name: &str,
        coordnames: &[&str],
        coords: impl Into<ArrayView<'a>>,
        nzones: usize,
        zonel_name: Option<&str>,
        facel_name: Option<&str>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data
            .put_ucdmesh(name, coordnames, coords, nzones, zonel_name, facel_name, optlist)?;
        self.added_mesh(name, ObjectType::UcdMesh, optlist)
    }

    pub fn put_ucdvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_ucdvar1(name, meshname, var, centering, optlist)?;
        self.added_variable(name, ObjectType::UcdVar, optlist)
    }

    pub fn put_ucdvar(
        &mut self,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_ucdvar(name, meshname, varnames, vars, centering, optlist)?;
        self.added_variable(name, ObjectType::UcdVar, optlist)
    }

    pub fn put_pointmesh<'a>(
        &mut self,
        name: &str,
        coords: impl Into<ArrayView<'a>>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_pointmesh(name, coords, optlist)?;
        self.added_mesh(name, ObjectType::PointMesh, optlist)
    }

    pub fn put_pointvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_pointvar1(name, meshname, var, optlist)?;
        self.added_variable(name, ObjectType::PointVar, optlist)
    }

    pub fn put_pointvar(
        &mut self,
        name: &str,
        meshname: &str,
        vars: &[ArrayView<'_>],
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_pointvar(name, meshname, vars, optlist)?;
        self.added_variable(name, ObjectType::PointVar, optlist)
    }

    pub fn put_quadmesh(
        &mut self,
        name: &str,
        coords: &[ArrayView<'_>],
        coordtype: CoordType,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_quadmesh(name, coords, coordtype, optlist)?;
        self.added_mesh(name, ObjectType::QuadMesh, optlist)
    }

    pub fn put_quadvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        dims: &[usize],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data.put_quadvar1(name, meshname, var, dims, centering, optlist)?;
        self.added_variable(name, ObjectType::QuadVar, optlist)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn put_quadvar(
        &mut self,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        dims: &[usize],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.data
            .put_quadvar(name, meshname, varnames, vars, dims, centering, optlist)?;
        self.added_variable(name, ObjectType::QuadVar, optlist)
    }

    /// Derived variables live in the master file only; other ranks skip them.
    pub fn put_defvars(&mut self, name: &str, defs: &[DefVar<'_>]) -> Result<()> {
        match self.master.as_mut() {
            Some(m) => m.file.put_defvars(name, defs),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ParallelDbFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelDbFile")
            .field("rank", &self.rank)
            .field("data", &self.data)
            .field("master", &self.master.as_ref().map(|m| &m.file))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(rank_path("out/run", 3), PathBuf::from("out/run-00003.silo"));
        assert_eq!(master_path("out/run"), PathBuf::from("out/run.silo"));
    }
}
