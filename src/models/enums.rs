use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Parsing ignores surrounding whitespace and ASCII case; serde goes through
/// the same string form.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Sex {
    Male => "male",
    Female => "female",
    Other => "other",
    Unspecified => "",
});

impl Default for Sex {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Sex {
    pub fn is_unspecified(&self) -> bool {
        *self == Self::Unspecified
    }
}

str_enum!(ImportSource {
    Url => "url",
    EncryptedUrl => "encrypted_url",
    File => "file",
    PastedJson => "pasted_json",
    PastedText => "pasted_text",
    FormEdit => "form_edit",
});
