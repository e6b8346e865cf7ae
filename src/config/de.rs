//! Deserializes a [`ConfigTree`] straight into user types.
//!
//! Scalars stay strings until the target type asks for something else, so
//! `version = 1.4` fills a `String` field as `"1.4"` and an `f64` field as
//! `1.4`.

use serde::de::value::{MapDeserializer, StringDeserializer};
use serde::de::{DeserializeOwned, Deserializer, Error as _, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use toml::de::Error;

use crate::ini::{ConfigNode, ConfigTree};

pub fn from_tree<T: DeserializeOwned>(tree: ConfigTree) -> Result<T, Error> {
    T::deserialize(NodeDeserializer(ConfigNode::Tree(tree)))
}

pub struct NodeDeserializer(ConfigNode);

impl<'de> IntoDeserializer<'de, Error> for ConfigNode {
    type Deserializer = NodeDeserializer;

    fn into_deserializer(self) -> Self::Deserializer {
        NodeDeserializer(self)
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                match self.0 {
                    ConfigNode::Scalar(s) => match s.trim().parse::<$ty>() {
                        Ok(value) => visitor.$visit(value),
                        Err(_) => Err(Error::invalid_value(Unexpected::Str(&s), &visitor)),
                    },
                    tree => NodeDeserializer(tree).deserialize_any(visitor),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for NodeDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            ConfigNode::Scalar(s) => visitor.visit_string(s),
            ConfigNode::Tree(tree) => visitor.visit_map(MapDeserializer::new(tree.into_iter())),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            ConfigNode::Scalar(s) => match parse_bool(&s) {
                Some(value) => visitor.visit_bool(value),
                None => Err(Error::invalid_value(Unexpected::Str(&s), &visitor)),
            },
            tree => NodeDeserializer(tree).deserialize_any(visitor),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.0 {
            ConfigNode::Scalar(s) => {
                let variant: StringDeserializer<Error> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            tree => NodeDeserializer(tree).deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if ["true", "on", "yes", "1"].iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if ["false", "off", "no", "0", ""].iter().any(|f| s.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::parse;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    #[allow(dead_code)]
    enum Level {
        Info,
        Warn,
    }

    #[derive(Debug, Deserialize)]
    struct Settings {
        version: String,
        ratio: f64,
        port: u16,
        offset: i32,
        flag: bool,
        verbose: bool,
        level: Level,
        missing: Option<String>,
        present: Option<u8>,
        labels: HashMap<String, String>,
    }

    #[test]
    fn test_scalars_follow_target_type() {
        let tree = parse(
            "version = 1.4\nratio = 1.4\nport = 8080\noffset = -3\nflag = TRUE\n\
             verbose = off\nlevel = warn\npresent = 7\n[labels]\na = 1\nb = x\n",
        )
        .unwrap();

        let settings: Settings = from_tree(tree).unwrap();

        assert_eq!(settings.version, "1.4");
        assert_eq!(settings.ratio, 1.4);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.offset, -3);
        assert!(settings.flag);
        assert!(!settings.verbose);
        assert_eq!(settings.level, Level::Warn);
        assert_eq!(settings.missing, None);
        assert_eq!(settings.present, Some(7));
        assert_eq!(settings.labels["a"], "1");
        assert_eq!(settings.labels.len(), 2);
    }

    #[test]
    fn test_numeric_looking_string_stays_string() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }

        let named: Named = from_tree(parse("name = 0042\n").unwrap()).unwrap();
        assert_eq!(named.name, "0042");
    }

    #[test]
    fn test_invalid_number() {
        #[derive(Debug, Deserialize)]
        struct Port {
            #[allow(dead_code)]
            port: u16,
        }

        let err = from_tree::<Port>(parse("port = 99999\n").unwrap()).unwrap_err();
        assert!(err.to_string().contains("99999"));
    }

    #[test]
    fn test_scalar_where_table_expected() {
        #[derive(Debug, Deserialize)]
        struct Outer {
            #[allow(dead_code)]
            inner: HashMap<String, String>,
        }

        assert!(from_tree::<Outer>(parse("inner = flat\n").unwrap()).is_err());
    }
}
