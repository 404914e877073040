//! Option keys and the value kind the native library reads for each.

/// How the native library interprets the bytes stored under a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    /// One native `int`
    Int,
    /// One `float`
    Float,
    /// One `double`
    Double,
    /// NUL-terminated string
    Str,
    /// Run of native `int`s
    Ints,
}

pub const DBOPT_ALIGN: i32 = 260;
pub const DBOPT_COORDSYS: i32 = 262;
pub const DBOPT_CYCLE: i32 = 263;
pub const DBOPT_FACETYPE: i32 = 264;
pub const DBOPT_HI_OFFSET: i32 = 265;
pub const DBOPT_LO_OFFSET: i32 = 266;
pub const DBOPT_LABEL: i32 = 267;
pub const DBOPT_XLABEL: i32 = 268;
pub const DBOPT_YLABEL: i32 = 269;
pub const DBOPT_ZLABEL: i32 = 270;
pub const DBOPT_MAJORORDER: i32 = 271;
pub const DBOPT_NSPACE: i32 = 272;
pub const DBOPT_ORIGIN: i32 = 273;
pub const DBOPT_PLANAR: i32 = 274;
pub const DBOPT_TIME: i32 = 275;
pub const DBOPT_UNITS: i32 = 276;
pub const DBOPT_XUNITS: i32 = 277;
pub const DBOPT_YUNITS: i32 = 278;
pub const DBOPT_ZUNITS: i32 = 279;
pub const DBOPT_DTIME: i32 = 280;
pub const DBOPT_USESPECMF: i32 = 281;
pub const DBOPT_XVARNAME: i32 = 282;
pub const DBOPT_YVARNAME: i32 = 283;
pub const DBOPT_ZVARNAME: i32 = 284;
pub const DBOPT_ASCII_LABEL: i32 = 285;
pub const DBOPT_MATNOS: i32 = 286;
pub const DBOPT_NMATNOS: i32 = 287;
pub const DBOPT_MATNAME: i32 = 288;
pub const DBOPT_NMAT: i32 = 289;
pub const DBOPT_NMATSPEC: i32 = 290;
pub const DBOPT_BASEINDEX: i32 = 291;
pub const DBOPT_ZONENUM: i32 = 292;
pub const DBOPT_NODENUM: i32 = 293;
pub const DBOPT_BLOCKORIGIN: i32 = 294;
pub const DBOPT_GROUPNUM: i32 = 295;
pub const DBOPT_GROUPORIGIN: i32 = 296;
pub const DBOPT_NGROUPS: i32 = 297;
pub const DBOPT_MATNAMES: i32 = 298;
pub const DBOPT_EXTENTS_SIZE: i32 = 299;
pub const DBOPT_EXTENTS: i32 = 300;
pub const DBOPT_MATCOUNTS: i32 = 301;
pub const DBOPT_MATLISTS: i32 = 302;
pub const DBOPT_MIXLENS: i32 = 303;
pub const DBOPT_ZONECOUNTS: i32 = 304;
pub const DBOPT_HAS_EXTERNAL_ZONES: i32 = 305;
pub const DBOPT_PHZONELIST: i32 = 306;
pub const DBOPT_MATCOLORS: i32 = 307;
pub const DBOPT_BNDNAMES: i32 = 308;
pub const DBOPT_REGNAMES: i32 = 309;
pub const DBOPT_ZONENAMES: i32 = 310;
pub const DBOPT_HIDE_FROM_GUI: i32 = 311;
pub const DBOPT_REFERENCE: i32 = 312;

/// The single key whose floating value keeps double precision.
pub const DOUBLE_PRECISION_KEY: i32 = DBOPT_DTIME;

/// Value kind the native library expects under `key`.
pub fn kind_of(key: i32) -> Option<OptionKind> {
    use OptionKind::*;
    let kind = match key {
        DBOPT_COORDSYS | DBOPT_CYCLE | DBOPT_FACETYPE | DBOPT_MAJORORDER | DBOPT_NSPACE | DBOPT_ORIGIN
        | DBOPT_PLANAR | DBOPT_USESPECMF | DBOPT_ASCII_LABEL | DBOPT_NMATNOS
        | DBOPT_NMAT | DBOPT_NMATSPEC | DBOPT_BLOCKORIGIN | DBOPT_GROUPNUM
        | DBOPT_GROUPORIGIN | DBOPT_NGROUPS | DBOPT_EXTENTS_SIZE
        | DBOPT_HIDE_FROM_GUI => Int,
        DBOPT_ALIGN | DBOPT_TIME => Float,
        DBOPT_DTIME => Double,
        DBOPT_LABEL | DBOPT_XLABEL | DBOPT_YLABEL | DBOPT_ZLABEL | DBOPT_UNITS
        | DBOPT_XUNITS | DBOPT_YUNITS | DBOPT_ZUNITS | DBOPT_XVARNAME
        | DBOPT_YVARNAME | DBOPT_ZVARNAME | DBOPT_MATNAME | DBOPT_PHZONELIST
        | DBOPT_REFERENCE => Str,
        DBOPT_MATNOS | DBOPT_BASEINDEX | DBOPT_LO_OFFSET | DBOPT_HI_OFFSET
        | DBOPT_ZONENUM | DBOPT_NODENUM | DBOPT_MATCOUNTS | DBOPT_MIXLENS | DBOPT_ZONECOUNTS
        | DBOPT_HAS_EXTERNAL_ZONES => Ints,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(kind_of(DBOPT_CYCLE), Some(OptionKind::Int));
        assert_eq!(kind_of(DBOPT_DTIME), Some(OptionKind::Double));
        assert_eq!(kind_of(DBOPT_TIME), Some(OptionKind::Float));
        assert_eq!(kind_of(DBOPT_XLABEL), Some(OptionKind::Str));
        assert_eq!(kind_of(DBOPT_BASEINDEX), Some(OptionKind::Ints));
        assert_eq!(kind_of(DBOPT_HI_OFFSET), Some(OptionKind::Ints));
        assert_eq!(kind_of(12345), None);
    }
}
