//! Integration tests: write objects, close, reopen and read them back.

use std::sync::Arc;

use visfile::native::sdb::SdbLibrary;
use visfile::prelude::*;

use tempfile::TempDir;

fn library() -> Arc<SdbLibrary> {
    Arc::new(SdbLibrary::new())
}

fn create(lib: &Arc<SdbLibrary>, dir: &TempDir, name: &str) -> DbFile {
    DbFile::create_with(lib.clone(), dir.path().join(name), &CreateOptions::default())
        .expect("Failed to create database")
}

fn reopen(lib: &Arc<SdbLibrary>, dir: &TempDir, name: &str) -> DbFile {
    DbFile::open_with(lib.clone(), dir.path().join(name), &OpenOptions::read_only())
        .expect("Failed to open database")
}

#[test]
fn test_curve_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    {
        let mut db = create(&lib, &dir, "curve.sdb");
        db.put_curve("c1", &[0.0f64, 1.0, 2.0, 3.0], &[0.0f64, 1.0, 4.0, 9.0], None)
            .expect("put_curve failed");
        db.close().unwrap();
    }

    let mut db = reopen(&lib, &dir, "curve.sdb");
    let curve = db.get_curve("c1").expect("get_curve failed");
    assert_eq!(curve.npts(), 4);
    assert_eq!(curve.datatype().unwrap(), DataType::Double);

    let x = curve.x().unwrap();
    let y = curve.y().unwrap();
    assert_eq!(x.shape().sizes(), &[4]);
    assert_eq!(x.as_slice::<f64>().unwrap(), &[0.0, 1.0, 2.0, 3.0]);
    assert_eq!(y.as_slice::<f64>().unwrap(), &[0.0, 1.0, 4.0, 9.0]);
}

#[test]
fn test_curve_float_and_options() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    let mut opts = OptionList::new(6, 128).unwrap();
    opts.add(DBOPT_XLABEL, "time").unwrap();
    opts.add(DBOPT_YLABEL, "energy").unwrap();
    opts.add(DBOPT_XUNITS, "s").unwrap();
    opts.add(DBOPT_LABEL, "decay").unwrap();

    let x: Vec<f32> = vec![0.0, 0.5, 1.0];
    let y: Vec<f32> = vec![1.0, 0.6, 0.37];
    {
        let mut db = create(&lib, &dir, "curve32.sdb");
        db.put_curve("decay", &x, &y, Some(&opts)).unwrap();
    }

    let mut db = reopen(&lib, &dir, "curve32.sdb");
    let curve = db.get_curve("decay").unwrap();
    assert_eq!(curve.datatype().unwrap(), DataType::Float);
    assert_eq!(curve.xlabel(), Some("time"));
    assert_eq!(curve.ylabel(), Some("energy"));
    assert_eq!(curve.xunits(), Some("s"));
    assert_eq!(curve.yunits(), None);
    assert_eq!(curve.title(), Some("decay"));
    assert_eq!(curve.y().unwrap().to_vec::<f32>().unwrap(), y);
}

#[test]
fn test_quadmesh_and_quadvar_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    let xs = [0.0f64, 0.5, 1.0];
    let ys = [0.0f64, 1.0, 2.0, 3.0];
    let values: Vec<f64> = (0..12).map(f64::from).collect();

    let mut mesh_opts = OptionList::new(4, 64).unwrap();
    mesh_opts.add(DBOPT_CYCLE, 42).unwrap();
    mesh_opts.add(DBOPT_DTIME, 0.125f64).unwrap();
    mesh_opts.add(DBOPT_XLABEL, "x").unwrap();

    {
        let mut db = create(&lib, &dir, "grid.sdb");
        db.put_quadmesh(
            "mesh",
            &[ArrayView::from(&xs), ArrayView::from(&ys)],
            CoordType::Collinear,
            Some(&mesh_opts),
        )
        .unwrap();
        db.put_quadvar1("rho", "mesh", &values, &[3, 4], Centering::Node, None)
            .unwrap();
        db.close().unwrap();
    }

    let mut db = reopen(&lib, &dir, "grid.sdb");

    let mesh = db.get_quadmesh("mesh").unwrap();
    assert_eq!(mesh.dims(), vec![3, 4]);
    assert_eq!(mesh.ndims(), 2);
    assert_eq!(mesh.nnodes(), 12);
    assert_eq!(mesh.cycle(), 42);
    assert_eq!(mesh.dtime(), 0.125);
    assert_eq!(mesh.coordtype(), Some(CoordType::Collinear));
    assert_eq!(mesh.labels()[0], Some("x"));
    assert_eq!(mesh.labels()[1], None);
    assert_eq!(mesh.max_extents()[0], 1.0);
    assert_eq!(mesh.max_extents()[1], 3.0);

    let coords = mesh.coords().unwrap();
    assert_eq!(coords.len(), 2);
    assert_eq!(coords[0].shape().sizes(), &[3]);
    assert_eq!(coords[1].as_slice::<f64>().unwrap(), &ys);

    let var = db.get_quadvar("rho").unwrap();
    assert_eq!(var.meshname(), Some("mesh"));
    assert_eq!(var.nvals(), 1);
    assert_eq!(var.dims(), vec![3, 4]);
    assert_eq!(var.major_order(), MajorOrder::RowMajor);
    assert_eq!(var.centering(), Some(Centering::Node));

    let vals = var.vals().unwrap();
    assert_eq!(vals[0].shape().sizes(), &[3, 4]);
    assert_eq!(vals[0].as_slice::<f64>().unwrap(), values.as_slice());
    // Row-major: element (1, 2) is at 1 * 4 + 2.
    assert_eq!(vals[0].get::<f64>(&[1, 2]).unwrap(), 6.0);
}

#[test]
fn test_quadvar_column_major() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    let values: Vec<f32> = (0..6).map(|v| v as f32).collect();
    let mut opts = OptionList::new(2, 16).unwrap();
    opts.add(DBOPT_MAJORORDER, 1).unwrap();

    {
        let mut db = create(&lib, &dir, "colmajor.sdb");
        db.put_quadvar1("v", "mesh", &values, &[2, 3], Centering::Zone, Some(&opts))
            .unwrap();
    }

    let mut db = reopen(&lib, &dir, "colmajor.sdb");
    let var = db.get_quadvar("v").unwrap();
    assert_eq!(var.major_order(), MajorOrder::ColumnMajor);
    assert_eq!(var.stride(), [1, 2, 0]);
    assert_eq!(var.align(), [0.5, 0.5, 0.0]);

    let vals = var.vals().unwrap();
    assert_eq!(vals[0].as_slice::<f32>().unwrap(), values.as_slice());
    // Column-major: element (1, 2) is at 1 + 2 * 2.
    assert_eq!(vals[0].get::<f32>(&[1, 2]).unwrap(), 5.0);
}

#[test]
fn test_multicomponent_quadvar() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    let u = [1.0f64, 2.0, 3.0, 4.0];
    let v = [5.0f64, 6.0, 7.0, 8.0];
    {
        let mut db = create(&lib, &dir, "vec.sdb");
        db.put_quadvar(
            "velocity",
            "mesh",
            &["u", "v"],
            &[ArrayView::from(&u), ArrayView::from(&v)],
            &[2, 2],
            Centering::Zone,
            None,
        )
        .unwrap();
    }

    let mut db = reopen(&lib, &dir, "vec.sdb");
    let var = db.get_quadvar("velocity").unwrap();
    let vals = var.vals().unwrap();
    assert_eq!(vals.len(), 2);
    assert_eq!(vals[0].as_slice::<f64>().unwrap(), &u);
    assert_eq!(vals[1].as_slice::<f64>().unwrap(), &v);
}

#[test]
fn test_noncollinear_quadmesh() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();

    // 2 x 2 curvilinear grid
    let xs = [0.0f32, 1.0, 0.1, 1.1];
    let ys = [0.0f32, 0.0, 1.0, 1.0];
    {
        let mut db = create(&lib, &dir, "curvi.sdb");
        db.put_quadmesh(
            "mesh",
            &[
                ArrayView::with_shape(&xs, (2, 2)).unwrap(),
                ArrayView::with_shape(&ys, (2, 2)).unwrap(),
            ],
            CoordType::NonCollinear,
            None,
        )
        .unwrap();
    }

    let mut db = reopen(&lib, &dir, "curvi.sdb");
    let mesh = db.get_quadmesh("mesh").unwrap();
    assert_eq!(mesh.coordtype(), Some(CoordType::NonCollinear));
    let coords = mesh.coords().unwrap();
    assert_eq!(coords[0].shape().sizes(), &[2, 2]);
    assert_eq!(coords[0].get::<f32>(&[1, 0]).unwrap(), 0.1);
}

#[test]
fn test_toc_listing() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();
    let mut db = DbFile::create_with(
        lib.clone(),
        dir.path().join("toc.sdb"),
        &CreateOptions::new().with_info(""),
    )
    .unwrap();

    let toc = db.get_toc().unwrap();
    assert!(toc.is_empty());
    for (_, names) in toc.iter() {
        assert!(names.is_empty());
    }

    db.put_curve("c1", &[0.0f64, 1.0], &[1.0f64, 2.0], None).unwrap();
    db.put_quadmesh(
        "qm",
        &[ArrayView::from(&[0.0f64, 1.0]), ArrayView::from(&[0.0f64, 1.0])],
        CoordType::Collinear,
        None,
    )
    .unwrap();

    let toc = db.get_toc().unwrap();
    assert_eq!(toc.curve_names(), &["c1".to_string()]);
    assert_eq!(toc.qmesh_names(), &["qm".to_string()]);
    assert_eq!(toc.total(), 2);
    assert_eq!(toc.names(TocList::Qmesh), toc.qmesh_names());

    let json = toc.to_json();
    assert_eq!(json["curve_names"][0], "c1");
}

#[test]
fn test_unstructured_mesh_and_point_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();
    let mut db = create(&lib, &dir, "ucd.sdb");

    // one triangle: 2 axes x 3 nodes
    let coords = [0.0f64, 1.0, 0.0, 0.0, 0.0, 1.0];
    let coords = ArrayView::with_shape(&coords, (2, 3)).unwrap();
    db.put_zonelist("zl", 1, 2, &[0, 1, 2], &[3], &[1]).unwrap();
    db.put_ucdmesh("ucd", &["x", "y"], coords, 1, Some("zl"), None, None)
        .unwrap();
    db.put_ucdvar1("temp", "ucd", &[1.0f64, 2.0, 3.0], Centering::Node, None)
        .unwrap();
    db.put_ucdvar(
        "disp",
        "ucd",
        &["dx", "dy"],
        &[ArrayView::from(&[0.1f64, 0.2, 0.3]), ArrayView::from(&[0.0f64, 0.0, 0.1])],
        Centering::Node,
        None,
    )
    .unwrap();

    let points = [0.0f32, 1.0, 2.0, 0.0, 1.0, 4.0];
    db.put_pointmesh("pts", ArrayView::with_shape(&points, (2, 3)).unwrap(), None)
        .unwrap();
    db.put_pointvar1("mass", "pts", &[1.0f32, 1.0, 2.0], None).unwrap();
    db.put_pointvar(
        "vel",
        "pts",
        &[ArrayView::from(&[1.0f32, 0.0, 0.0]), ArrayView::from(&[0.0f32, 1.0, 0.0])],
        None,
    )
    .unwrap();

    let toc = db.get_toc().unwrap();
    assert_eq!(toc.ucdmesh_names(), &["ucd".to_string()]);
    assert_eq!(toc.ucdvar_names().len(), 2);
    assert_eq!(toc.ptmesh_names(), &["pts".to_string()]);
    assert_eq!(toc.ptvar_names().len(), 2);
}

#[test]
fn test_multiblock_and_defvars() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();
    let mut db = create(&lib, &dir, "multi.sdb");

    db.put_multimesh(
        "domain",
        &[("block0.sdb:mesh", ObjectType::QuadMesh), ("block1.sdb:mesh", ObjectType::QuadMesh)],
        None,
    )
    .unwrap();
    db.put_multivar(
        "rho",
        &[("block0.sdb:rho", ObjectType::QuadVar), ("block1.sdb:rho", ObjectType::QuadVar)],
        None,
    )
    .unwrap();

    let mut hidden = OptionList::new(1, 8).unwrap();
    hidden.add(DBOPT_HIDE_FROM_GUI, 1).unwrap();
    db.put_defvars(
        "exprs",
        &[
            DefVar::new("speed", "magnitude(velocity)"),
            DefVar::new("vel", "{u, v}").with_kind(VarType::Vector).with_options(&hidden),
        ],
    )
    .unwrap();

    let toc = db.get_toc().unwrap();
    assert_eq!(toc.multimesh_names(), &["domain".to_string()]);
    assert_eq!(toc.multivar_names(), &["rho".to_string()]);
    assert_eq!(toc.defvars_names(), &["exprs".to_string()]);
}

#[test]
fn test_alias_outlives_result() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library();
    {
        let mut db = create(&lib, &dir, "alias.sdb");
        db.put_curve("c", &[1.0f64, 2.0, 3.0], &[4.0f64, 5.0, 6.0], None).unwrap();
    }

    let mut db = reopen(&lib, &dir, "alias.sdb");
    let y = {
        let curve = db.get_curve("c").unwrap();
        let clone = curve.clone();
        drop(curve);
        clone.y().unwrap()
    };
    db.close().unwrap();

    // The struct is still alive through the alias.
    assert_eq!(lib.stats().live(), 1);
    assert_eq!(y.as_slice::<f64>().unwrap(), &[4.0, 5.0, 6.0]);

    let x_and_y = y.clone();
    drop(y);
    assert_eq!(lib.stats().live(), 1);
    drop(x_and_y);
    assert_eq!(lib.stats().live(), 0);
    assert_eq!(lib.stats().frees(), 1);
}
