use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{MapAccess, SeqAccess, Visitor};

use crate::Value;
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};

// -----------------------------------------------------------------------------
// DefaultSeqDeserializer

/// Reads any sequence not claimed by a container strategy into
/// [`Value::Seq`].
#[derive(Debug)]
pub(crate) struct DefaultSeqDeserializer {
    pub element: Arc<dyn ValueDeserializer>,
    pub discriminator: Option<Arc<dyn TypeDiscriminator>>,
}

struct SeqVisitor<'a> {
    element: DeserializeDriver<'a>,
}

impl<'de> Visitor<'de> for SeqVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element_seed(self.element)? {
            items.push(item);
        }
        Ok(Value::Seq(items))
    }
}

impl ValueDeserializer for DefaultSeqDeserializer {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        let element =
            DeserializeDriver::with_discriminator(&*self.element, self.discriminator.as_deref());
        deserializer.deserialize_seq(SeqVisitor { element })
    }
}

// -----------------------------------------------------------------------------
// DefaultMapDeserializer

/// Reads any map not claimed by a container strategy into [`Value::Map`],
/// keeping entry order and duplicate keys.
#[derive(Debug)]
pub(crate) struct DefaultMapDeserializer {
    pub key: Arc<dyn ValueDeserializer>,
    pub value: Arc<dyn ValueDeserializer>,
    pub discriminator: Option<Arc<dyn TypeDiscriminator>>,
}

struct MapVisitor<'a> {
    key: DeserializeDriver<'a>,
    value: DeserializeDriver<'a>,
}

impl<'de> Visitor<'de> for MapVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(entry) = map.next_entry_seed(self.key, self.value)? {
            entries.push(entry);
        }
        Ok(Value::Map(entries))
    }
}

impl ValueDeserializer for DefaultMapDeserializer {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_map(MapVisitor {
            key: DeserializeDriver::new(&*self.key),
            value: DeserializeDriver::with_discriminator(
                &*self.value,
                self.discriminator.as_deref(),
            ),
        })
    }
}
