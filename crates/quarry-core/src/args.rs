use crate::{error::Error, value::Value};
use serde::{Deserialize, Serialize};

///
/// Arguments
///
/// Named argument record for one query. Names match the `@name`
/// placeholders embedded in the SQL text, without the `@`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Arguments(Vec<(String, Value)>);

impl Arguments {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace the argument called `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Reflect the record's field names onto command parameters.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        self.0
            .iter()
            .map(|(name, value)| Parameter {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Build arguments from any serializable struct or map.
    ///
    /// Field order follows serde_json's map ordering.
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> Result<Self, Error> {
        let json = serde_json::to_value(record)
            .map_err(|err| Error::configuration(format!("arguments are not serializable: {err}")))?;

        let serde_json::Value::Object(fields) = json else {
            return Err(Error::configuration(
                "arguments must serialize to a record of named fields",
            ));
        };

        fields
            .into_iter()
            .map(|(name, json)| {
                Value::from_json(json)
                    .map(|value| (name.clone(), value))
                    .map_err(|err| Error::configuration(format!("argument '{name}': {err}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

///
/// Parameter
/// One named command parameter handed to the executor.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
}

/// Build an [`Arguments`] record: `args! { id => 7, name => "x" }`.
#[macro_export]
macro_rules! args {
    () => {
        $crate::args::Arguments::new()
    };
    ($($name:ident => $value:expr),+ $(,)?) => {
        $crate::args::Arguments::new()
            $(.with(stringify!($name), $value))+
    };
}
