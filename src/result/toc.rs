//! Table of contents: independent copy of a database's name listings.

use serde_json::{Map, Value};

use crate::native::{Capabilities, NativeToc, TocField, TOC_FIELDS};

macro_rules! toc_lists {
    ($($variant:ident => $accessor:ident,)+) => {
        /// Name lists of a table of contents, in listing order.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum TocList {
            $($variant,)+
        }

        impl TocList {
            /// Every list, in listing order.
            pub const ALL: [TocList; TOC_FIELDS.len()] = [$(TocList::$variant,)+];
        }

        impl TableOfContents {
            $(
                pub fn $accessor(&self) -> &[String] {
                    self.names(TocList::$variant)
                }
            )+
        }
    };
}

toc_lists! {
    Curve => curve_names,
    Multimesh => multimesh_names,
    Multimeshadj => multimeshadj_names,
    Multivar => multivar_names,
    Multimat => multimat_names,
    Multimatspecies => multimatspecies_names,
    Csgmesh => csgmesh_names,
    Csgvar => csgvar_names,
    Defvars => defvars_names,
    Qmesh => qmesh_names,
    Qvar => qvar_names,
    Ucdmesh => ucdmesh_names,
    Ucdvar => ucdvar_names,
    Ptmesh => ptmesh_names,
    Ptvar => ptvar_names,
    Mat => mat_names,
    Matspecies => matspecies_names,
    Var => var_names,
    Obj => obj_names,
    Dir => dir_names,
    Array => array_names,
    Mrgtree => mrgtree_names,
    Groupelmap => groupelmap_names,
    Mrgvar => mrgvar_names,
}

impl TocList {
    /// Field layout of this list.
    pub fn field(self) -> &'static TocField {
        &TOC_FIELDS[self as usize]
    }

    /// Name of the list, e.g. `"curve_names"`.
    pub fn name(self) -> &'static str {
        self.field().list
    }
}

/// Snapshot of every name list of a database.
///
/// Holds owned copies, so it stays valid after the file changes or closes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableOfContents {
    lists: Vec<Vec<String>>,
}

/// Count of a list, probing both spellings of its count field; the
/// spelling of the linked library generation is tried first.
fn probe_count(toc: &NativeToc, field: &TocField, caps: &Capabilities) -> Option<usize> {
    let preferred = field.count_for(caps.toc_singular_counts);
    let fallback = field.count_for(!caps.toc_singular_counts);
    toc.count(preferred).or_else(|| toc.count(fallback))
}

impl TableOfContents {
    /// Copy every name list out of a native listing.
    pub fn from_native(toc: &NativeToc, caps: &Capabilities) -> Self {
        let lists = TOC_FIELDS
            .iter()
            .map(|field| {
                let names = toc.names(field.list).unwrap_or(&[]);
                let count = probe_count(toc, field, caps).unwrap_or(names.len());
                if count > names.len() {
                    tracing::warn!(list = field.list, count, available = names.len(), "toc count exceeds names");
                }
                names.iter().take(count).cloned().collect()
            })
            .collect();
        Self { lists }
    }

    /// Names in `list`.
    pub fn names(&self, list: TocList) -> &[String] {
        self.lists.get(list as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(list, names)` pairs in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (TocList, &[String])> {
        TocList::ALL.into_iter().map(move |list| (list, self.names(list)))
    }

    /// Total number of names across all lists.
    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// JSON object keyed by list name.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(list, names)| (list.name().to_string(), Value::from(names.to_vec())))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::Version;

    fn native_toc(singular: bool) -> NativeToc {
        let mut toc = NativeToc::new();
        for field in TOC_FIELDS.iter() {
            toc.set(field.count_for(singular), field.list, Vec::new());
        }
        toc.set("ncurve", "curve_names", vec!["c1".into(), "c2".into()]);
        toc.set(
            TocList::Array.field().count_for(singular),
            "array_names",
            vec!["a".into()],
        );
        toc
    }

    #[test]
    fn test_list_order_matches_fields() {
        for (i, list) in TocList::ALL.iter().enumerate() {
            assert_eq!(list.name(), TOC_FIELDS[i].list);
        }
        assert_eq!(TocList::Mrgvar.name(), "mrgvar_names");
    }

    #[test]
    fn test_copy_from_new_library() {
        let caps = Capabilities::from_version(Version::new(4, 10, 2));
        let toc = TableOfContents::from_native(&native_toc(true), &caps);
        assert_eq!(toc.curve_names(), &["c1".to_string(), "c2".to_string()]);
        assert_eq!(toc.array_names(), &["a".to_string()]);
        assert_eq!(toc.total(), 3);
    }

    #[test]
    fn test_plural_counts_are_probed() {
        // Library claims a new version but still spells counts the old way.
        let caps = Capabilities::from_version(Version::new(4, 10, 2));
        let toc = TableOfContents::from_native(&native_toc(false), &caps);
        assert_eq!(toc.array_names().len(), 1);

        let old = Capabilities::from_version(Version::new(4, 8, 0));
        let toc = TableOfContents::from_native(&native_toc(false), &old);
        assert_eq!(toc.array_names().len(), 1);
    }

    #[test]
    fn test_count_limits_names() {
        let mut native = NativeToc::new();
        native.set("ncurve", "curve_names", vec!["a".into(), "b".into()]);
        native.set("nvar", "var_names", vec!["x".into(), "y".into()]);
        native.set_count("nvar", 1);
        native.set_count("nqmesh", 3);
        let caps = Capabilities::from_version(Version::new(4, 10, 2));
        let toc = TableOfContents::from_native(&native, &caps);
        assert_eq!(toc.curve_names().len(), 2);
        assert_eq!(toc.var_names(), &["x".to_string()]);
        // count without names
        assert!(toc.qmesh_names().is_empty());
    }

    #[test]
    fn test_to_json() {
        let caps = Capabilities::from_version(Version::new(4, 10, 2));
        let toc = TableOfContents::from_native(&native_toc(true), &caps);
        let json = toc.to_json();
        assert_eq!(json["curve_names"], serde_json::json!(["c1", "c2"]));
        assert_eq!(json.as_object().map(|m| m.len()), Some(24));
    }
}
