/// Indirect object identifier: object number plus generation.
/// Documents built by this crate only ever use generation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// The subset of PDF object types (PDF 32000-1:2008 §7.3) this
/// writer emits.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string, stored without the enclosing parens.
    Text(String),
    Array(Vec<Object>),
    /// Vec-backed so output order is deterministic. Identical input
    /// must produce byte-identical files.
    Dict(Vec<(String, Object)>),
    Stream {
        dict: Vec<(String, Object)>,
        data: Vec<u8>,
    },
    Ref(ObjId),
}

impl Object {
    pub fn name(s: &str) -> Self {
        Object::Name(s.to_string())
    }

    pub fn text(s: &str) -> Self {
        Object::Text(s.to_string())
    }

    pub fn dict(entries: Vec<(&str, Object)>) -> Self {
        Object::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn array(items: Vec<Object>) -> Self {
        Object::Array(items)
    }

    pub fn stream(dict_entries: Vec<(&str, Object)>, data: Vec<u8>) -> Self {
        Object::Stream {
            dict: dict_entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_id_equality() {
        assert_eq!(ObjId(4, 0), ObjId(4, 0));
        assert_ne!(ObjId(4, 0), ObjId(5, 0));
    }

    #[test]
    fn dict_preserves_entry_order() {
        let obj = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::Ref(ObjId(2, 0))),
            ("Contents", Object::Ref(ObjId(9, 0))),
        ]);
        match obj {
            Object::Dict(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["Type", "Parent", "Contents"]);
            }
            _ => panic!("expected Dict"),
        }
    }

    #[test]
    fn stream_keeps_dict_and_data() {
        let obj = Object::stream(
            vec![("Filter", Object::name("FlateDecode"))],
            b"BT ET".to_vec(),
        );
        match obj {
            Object::Stream { dict, data } => {
                assert_eq!(dict.len(), 1);
                assert_eq!(data, b"BT ET");
            }
            _ => panic!("expected Stream"),
        }
    }
}
