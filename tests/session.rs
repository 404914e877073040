//! Integration tests for session state, validation and library versions.

use std::sync::Arc;

use visfile::native::codes::{E_FEXIST, E_FILENOWRITE, E_NOFILE, E_NOOVERWRITE};
use visfile::native::sdb::SdbLibrary;
use visfile::native::{FileType, Version};
use visfile::prelude::*;

use tempfile::TempDir;

fn session(dir: &TempDir, lib: &Arc<SdbLibrary>) -> DbFile {
    DbFile::create_with(lib.clone(), dir.path().join("s.sdb"), &CreateOptions::default()).unwrap()
}

#[test]
fn test_close_twice_and_use_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    db.close().unwrap();
    assert!(!db.is_open());
    assert!(matches!(db.close(), Err(Error::AlreadyClosed)));

    let x = [1.0f64, 2.0];
    assert!(matches!(db.put_curve("c", &x, &x, None), Err(Error::DatabaseClosed)));
    assert!(matches!(db.get_curve("c"), Err(Error::DatabaseClosed)));
    assert!(matches!(db.get_quadmesh("m"), Err(Error::DatabaseClosed)));
    assert!(matches!(db.get_quadvar("v"), Err(Error::DatabaseClosed)));
    assert!(matches!(db.get_toc(), Err(Error::DatabaseClosed)));
    assert!(matches!(
        db.put_zonelist("zl", 1, 2, &[0, 1, 2], &[3], &[1]),
        Err(Error::DatabaseClosed)
    ));
    assert!(matches!(
        db.put_multimesh("mm", &[("a:m", ObjectType::QuadMesh)], None),
        Err(Error::DatabaseClosed)
    ));
    assert!(matches!(
        db.put_defvars("d", &[DefVar::new("a", "b")]),
        Err(Error::DatabaseClosed)
    ));
    assert_eq!(lib.stats().puts(), 0);
}

#[test]
fn test_drop_closes_and_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    {
        let mut db = session(&dir, &lib);
        db.put_curve("c", &[0.0f64, 1.0], &[2.0f64, 3.0], None).unwrap();
    }
    let mut db = DbFile::open_with(lib.clone(), dir.path().join("s.sdb"), &OpenOptions::read_only()).unwrap();
    assert_eq!(db.get_toc().unwrap().curve_names().len(), 1);
}

#[test]
fn test_length_mismatch_never_reaches_library() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    let a = [1.0f64, 2.0, 3.0];
    let b = [1.0f64, 2.0];

    let err = db
        .put_ucdvar(
            "vel",
            "mesh",
            &["u", "v"],
            &[ArrayView::from(&a), ArrayView::from(&b)],
            Centering::Node,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 3, actual: 2, .. }));
    assert!(err.to_string().contains("vel"));

    let err = db
        .put_pointvar("p", "pts", &[ArrayView::from(&a), ArrayView::from(&b)], None)
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));

    let err = db
        .put_quadvar(
            "q",
            "mesh",
            &["u", "v"],
            &[ArrayView::from(&a), ArrayView::from(&b)],
            &[3],
            Centering::Node,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));

    let err = db.put_curve("c", &a, &b, None).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));

    // varnames and vars disagree
    let err = db
        .put_ucdvar("vel", "mesh", &["u"], &[ArrayView::from(&a), ArrayView::from(&a)], Centering::Node, None)
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));

    assert_eq!(lib.stats().puts(), 0);
}

#[test]
fn test_type_mismatch_and_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    let a = [1.0f64, 2.0];
    let b = [1.0f32, 2.0];
    let err = db
        .put_pointvar("p", "pts", &[ArrayView::from(&a), ArrayView::from(&b)], None)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch { expected: DataType::Double, actual: DataType::Float, .. }
    ));

    let err = db.put_curve("c", &a, &b, None).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let ints = [1i32, 2, 3, 4];
    let err = db
        .put_quadvar1("q", "mesh", &ints, &[2, 2], Centering::Node, None)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));

    let coords = ArrayView::with_shape(&ints, (2, 2)).unwrap();
    let err = db.put_pointmesh("pts", coords, None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));

    assert_eq!(lib.stats().puts(), 0);
}

#[test]
fn test_invalid_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    // coordinates must be 2-D
    let flat = [0.0f64; 6];
    let err = db
        .put_ucdmesh("ucd", &[], &flat, 1, None, None, None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));

    // dims product must match the data
    let err = db
        .put_quadvar1("q", "mesh", &flat, &[2, 2], Centering::Node, None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));

    // dims rank must match multi-dimensional data
    let grid = ArrayView::with_shape(&flat, (2, 3)).unwrap();
    let err = db
        .put_quadvar1("q", "mesh", grid, &[6], Centering::Node, None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));

    assert_eq!(lib.stats().puts(), 0);
}

#[test]
fn test_arena_exhausted_scenario() {
    let mut opts = OptionList::new(5, 16).unwrap();
    opts.add(DBOPT_CYCLE, 1).unwrap();
    opts.add(DBOPT_ORIGIN, 0).unwrap();
    assert_eq!(opts.occupied(), 8);

    let err = opts.add(DBOPT_BASEINDEX, [0, 0, 0]).unwrap_err();
    assert!(matches!(
        err,
        Error::ArenaExhausted { requested: 12, occupied: 8, capacity: 16 }
    ));
    assert_eq!(opts.occupied(), 8);
    assert_eq!(opts.len(), 2);
}

#[test]
fn test_empty_component_list_is_library_decision() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    let err = db.put_pointvar("p", "pts", &[], None).unwrap_err();
    assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutPointvar", .. }));
    assert_eq!(lib.stats().puts(), 1);
}

#[test]
fn test_create_and_open_failures() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let path = dir.path().join("exists.sdb");

    DbFile::create_with(lib.clone(), &path, &CreateOptions::default())
        .unwrap()
        .close()
        .unwrap();

    let err = DbFile::create_with(lib.clone(), &path, &CreateOptions::default()).unwrap_err();
    assert!(matches!(err, Error::CreateFailed { code: E_FEXIST, .. }));

    DbFile::create_with(lib.clone(), &path, &CreateOptions::new().clobber()).unwrap();

    let err = DbFile::open_with(lib.clone(), dir.path().join("missing.sdb"), &OpenOptions::default()).unwrap_err();
    assert!(matches!(err, Error::OpenFailed { code: E_NOFILE, .. }));
    assert!(err.to_string().contains("missing.sdb"));
}

#[test]
fn test_read_only_and_overwrite_codes() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    {
        let mut db = session(&dir, &lib);
        db.put_curve("c", &[0.0f64], &[1.0f64], None).unwrap();
        let err = db.put_curve("c", &[0.0f64], &[1.0f64], None).unwrap_err();
        assert!(matches!(
            err,
            Error::NativeCallFailed { entry: "DBPutCurve", code: E_NOOVERWRITE }
        ));
    }

    let mut db = DbFile::open_with(lib.clone(), dir.path().join("s.sdb"), &OpenOptions::read_only()).unwrap();
    let err = db.put_curve("d", &[0.0f64], &[1.0f64], None).unwrap_err();
    assert!(matches!(err, Error::NativeCallFailed { code: E_FILENOWRITE, .. }));

    let mut db = DbFile::open_with(lib.clone(), dir.path().join("s.sdb"), &OpenOptions::default()).unwrap();
    db.put_curve("d", &[0.0f64], &[1.0f64], None).unwrap();
    assert_eq!(db.get_toc().unwrap().curve_names().len(), 2);
}

#[test]
fn test_old_library_conventions() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::with_version(Version::new(4, 5, 1)));
    let mut db = session(&dir, &lib);

    assert!(!db.capabilities().zonelist_ghosts);
    let err = db
        .put_zonelist_2("zl", 1, 2, &[0, 1, 2], 0, 0, &[12], &[3], &[1], None)
        .unwrap_err();
    assert!(matches!(err, Error::Unavailable { entry: "DBPutZonelist2", .. }));
    assert!(err.to_string().contains("4.5.1"));

    // Listing uses the plural count names of older libraries.
    db.put_curve("c", &[0.0f64], &[1.0f64], None).unwrap();
    let toc = db.get_toc().unwrap();
    assert_eq!(toc.curve_names(), &["c".to_string()]);
    assert_eq!(toc.var_names(), &["_fileinfo".to_string()]);

    let err = DbFile::create_with(
        lib.clone(),
        dir.path().join("core.sdb"),
        &CreateOptions::new().with_filetype(FileType::Hdf5Core),
    )
    .unwrap_err();
    assert!(matches!(err, Error::CreateFailed { .. }));
}

#[test]
fn test_zonelist_2_on_new_library() {
    let dir = tempfile::tempdir().unwrap();
    let lib = Arc::new(SdbLibrary::new());
    let mut db = session(&dir, &lib);

    let mut opts = OptionList::new(1, 16).unwrap();
    opts.add(DBOPT_LO_OFFSET, [0]).unwrap();
    db.put_zonelist_2("zl", 2, 2, &[0, 1, 2, 1, 3, 2], 0, 1, &[12], &[3], &[2], Some(&opts))
        .unwrap();

    let err = db
        .put_zonelist_2("zl2", 2, 2, &[0, 1, 2], 0, 0, &[12, 13], &[3], &[2], None)
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));
}
