//! Symbolic values exchanged with the native library.

/// Defines an enum whose variants map one-to-one onto native integers.
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($(#[$vmeta:meta])* $variant:ident = $raw:expr,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Native integer value.
            pub const fn as_raw(self) -> i32 {
                match self {
                    $(Self::$variant => $raw,)+
                }
            }

            /// Variant for a native integer value.
            pub fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $(x if x == $raw => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

raw_enum! {
    /// Where a variable's values live on its mesh.
    pub enum Centering {
        NotCentered = 0,
        Node = 110,
        Zone = 111,
        Face = 112,
        Boundary = 113,
    }
}

raw_enum! {
    /// Structured-grid coordinate layout.
    pub enum CoordType {
        /// One 1-D array per axis (rectilinear)
        Collinear = 130,
        /// One N-D array per axis (curvilinear)
        NonCollinear = 131,
    }
}

raw_enum! {
    /// Coordinate system of a mesh.
    pub enum CoordSystem {
        Cartesian = 120,
        Cylindrical = 121,
        Spherical = 122,
        Numerical = 123,
        Other = 124,
    }
}

raw_enum! {
    /// Kinds of objects stored in a database.
    pub enum ObjectType {
        Invalid = -1,
        QuadMesh = 500,
        QuadVar = 501,
        UcdMesh = 510,
        UcdVar = 511,
        MultiMesh = 520,
        MultiVar = 521,
        MultiMat = 522,
        MultiMatSpecies = 523,
        MultiMeshAdj = 524,
        Material = 530,
        MatSpecies = 531,
        Facelist = 550,
        Zonelist = 551,
        Edgelist = 552,
        PhZonelist = 553,
        CsgZonelist = 554,
        CsgMesh = 555,
        CsgVar = 556,
        Curve = 560,
        Defvars = 565,
        PointMesh = 570,
        PointVar = 571,
        Array = 580,
        Dir = 600,
        Variable = 610,
        MrgTree = 611,
        GroupElMap = 612,
        MrgVar = 613,
        UserDef = 700,
    }
}

raw_enum! {
    /// Type of a derived variable definition.
    pub enum VarType {
        Scalar = 200,
        Vector = 201,
        Tensor = 202,
        SymTensor = 203,
        Array = 204,
        Material = 205,
        Species = 206,
        Label = 207,
    }
}

raw_enum! {
    /// Zone shapes of an unstructured zonelist.
    pub enum ZoneType {
        Beam = 10,
        Polygon = 11,
        Triangle = 12,
        Quad = 13,
        Polyhedron = 20,
        Tet = 21,
        Pyramid = 22,
        Prism = 23,
        Hex = 24,
    }
}

raw_enum! {
    /// File driver selection for open and create.
    pub enum FileType {
        NetCdf = 0,
        Pdb = 2,
        Taurus = 3,
        Unknown = 5,
        Debug = 6,
        Hdf5 = 7,
        Hdf5Sec2 = 0x100 | 7,
        Hdf5Stdio = 0x200 | 7,
        Hdf5Core = 0x300 | 7,
        Hdf5Mpio = 0x400 | 7,
        Hdf5Mpiop = 0x500 | 7,
    }
}

impl FileType {
    /// True for HDF5 driver variants only present in newer libraries.
    pub fn is_extended_hdf5(self) -> bool {
        matches!(
            self,
            Self::Hdf5Sec2 | Self::Hdf5Stdio | Self::Hdf5Core | Self::Hdf5Mpio | Self::Hdf5Mpiop
        )
    }
}

raw_enum! {
    /// Access mode for opening an existing database.
    pub enum OpenMode {
        Read = 1,
        Append = 2,
    }
}

raw_enum! {
    /// Behaviour when creating over an existing file.
    pub enum CreateMode {
        Clobber = 0,
        NoClobber = 1,
    }
}

raw_enum! {
    /// Target machine architecture for created files.
    pub enum Target {
        Local = 0,
        Sun3 = 10,
        Sun4 = 11,
        Sgi = 12,
        Rs6000 = 13,
        Cray = 14,
        Intel = 15,
    }
}
