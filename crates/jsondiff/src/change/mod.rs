//! Document-level change envelope.
//!
//! A [`DocumentChange`] either modifies (or creates) a document through
//! per-key operations, or removes it. On the wire:
//!
//! ```json
//! {"id":"note","sv":3,"clientid":"c1","o":"M","v":{"title":{"o":"d","v":"=5\t+!"}},"ev":4,"cv":"cv1","ccid":"x"}
//! ```

pub mod stream;

use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::ApplyError;
use crate::operation::codec::from_json;
use crate::operation::Operation;
use crate::patch::{apply_object, PatchOptions};
use crate::text_delta::{MyersDelta, TextDelta};
use crate::value::Document;

/// What a change does to the document as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    /// `M`: modify the document, creating it if needed.
    Modify(BTreeMap<String, Operation>),
    /// `-`: remove the document.
    Remove,
}

impl ChangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOp::Modify(_) => "M",
            ChangeOp::Remove => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    /// Document id (`id`).
    pub id: Option<String>,
    /// Version the change was computed against (`sv`).
    pub source_version: Option<u64>,
    /// Originating client (`clientid`).
    pub client_id: Option<String>,
    pub operation: ChangeOp,
    /// Version after the change (`ev`).
    pub end_version: Option<u64>,
    /// Change-stream cursor (`cv`).
    pub current_version: Option<String>,
    /// Change-set ids this change acknowledges (`ccids`).
    pub changeset_ids: Vec<String>,
    /// Change-set id (`ccid`).
    pub changeset_id: Option<String>,
}

impl DocumentChange {
    fn new(operation: ChangeOp) -> Self {
        Self {
            id: None,
            source_version: None,
            client_id: None,
            operation,
            end_version: None,
            current_version: None,
            changeset_ids: Vec::new(),
            changeset_id: None,
        }
    }

    pub fn modify(ops: BTreeMap<String, Operation>) -> Self {
        Self::new(ChangeOp::Modify(ops))
    }

    pub fn remove() -> Self {
        Self::new(ChangeOp::Remove)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_source_version(mut self, version: u64) -> Self {
        self.source_version = Some(version);
        self
    }

    pub fn with_end_version(mut self, version: u64) -> Self {
        self.end_version = Some(version);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_current_version(mut self, cv: impl Into<String>) -> Self {
        self.current_version = Some(cv.into());
        self
    }

    pub fn with_changeset_id(mut self, ccid: impl Into<String>) -> Self {
        self.changeset_id = Some(ccid.into());
        self
    }

    pub fn with_changeset_ids<I, S>(mut self, ccids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changeset_ids = ccids.into_iter().map(Into::into).collect();
        self
    }

    /// The per-key operations of an `M` change.
    pub fn operations(&self) -> Option<&BTreeMap<String, Operation>> {
        match &self.operation {
            ChangeOp::Modify(ops) => Some(ops),
            ChangeOp::Remove => None,
        }
    }

    /// An `M` change without operations. Applying it only materializes the
    /// document.
    pub fn is_noop(&self) -> bool {
        self.operations().is_some_and(BTreeMap::is_empty)
    }

    pub fn is_remove(&self) -> bool {
        self.operation == ChangeOp::Remove
    }

    pub fn to_json_string(&self) -> Result<String, ApplyError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ApplyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the change to `doc` (`None` = the document does not exist) with
    /// the default text delta and options.
    pub fn apply(&self, doc: Option<&Document>) -> Result<Option<Document>, ApplyError> {
        self.apply_with(&MyersDelta, &PatchOptions::default(), doc)
    }

    /// Apply the change to a copy of `doc`. `Ok(None)` means the document was
    /// removed.
    pub fn apply_with<T: TextDelta + ?Sized>(
        &self,
        text: &T,
        options: &PatchOptions,
        doc: Option<&Document>,
    ) -> Result<Option<Document>, ApplyError> {
        match &self.operation {
            ChangeOp::Remove => {
                tracing::debug!(id = ?self.id, "removing document");
                Ok(None)
            }
            ChangeOp::Modify(ops) => {
                tracing::debug!(id = ?self.id, keys = ops.len(), created = doc.is_none(), "modifying document");
                let mut next = doc.cloned().unwrap_or_default();
                apply_object(text, options, &mut next, ops)?;
                Ok(Some(next))
            }
        }
    }
}

// ── serde ─────────────────────────────────────────────────────────────────

impl Serialize for DocumentChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(sv) = &self.source_version {
            map.serialize_entry("sv", sv)?;
        }
        if let Some(client_id) = &self.client_id {
            map.serialize_entry("clientid", client_id)?;
        }
        map.serialize_entry("o", self.operation.as_str())?;
        if let ChangeOp::Modify(ops) = &self.operation {
            if !ops.is_empty() {
                map.serialize_entry("v", ops)?;
            }
        }
        if let Some(ev) = &self.end_version {
            map.serialize_entry("ev", ev)?;
        }
        if let Some(cv) = &self.current_version {
            map.serialize_entry("cv", cv)?;
        }
        if !self.changeset_ids.is_empty() {
            map.serialize_entry("ccids", &self.changeset_ids)?;
        }
        if let Some(ccid) = &self.changeset_id {
            map.serialize_entry("ccid", ccid)?;
        }
        map.end()
    }
}

#[derive(serde::Deserialize)]
struct WireChange {
    id: Option<String>,
    sv: Option<u64>,
    clientid: Option<String>,
    o: String,
    // Missing and `null` must stay distinguishable.
    #[serde(default, deserialize_with = "present")]
    v: Option<Value>,
    ev: Option<u64>,
    cv: Option<String>,
    ccids: Option<Vec<String>>,
    ccid: Option<String>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<WireChange> for DocumentChange {
    type Error = ApplyError;

    fn try_from(wire: WireChange) -> Result<Self, Self::Error> {
        let operation = match (wire.o.as_str(), wire.v) {
            ("M", None) => ChangeOp::Modify(BTreeMap::new()),
            ("M", Some(Value::Object(map))) => ChangeOp::Modify(
                map.iter()
                    .map(|(key, op)| Ok((key.clone(), from_json(op)?)))
                    .collect::<Result<_, ApplyError>>()?,
            ),
            ("M", Some(other)) => {
                return Err(ApplyError::malformed("M", format!("operations must be an object, got {other}")))
            }
            ("-", None) => ChangeOp::Remove,
            ("-", Some(_)) => return Err(ApplyError::malformed("-", "document removal carries no operations")),
            (code, _) => return Err(ApplyError::InvalidOperation(code.to_owned())),
        };
        Ok(Self {
            id: wire.id,
            source_version: wire.sv,
            client_id: wire.clientid,
            operation,
            end_version: wire.ev,
            current_version: wire.cv,
            changeset_ids: wire.ccids.unwrap_or_default(),
            changeset_id: wire.ccid,
        })
    }
}

impl<'de> Deserialize<'de> for DocumentChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireChange::deserialize(deserializer)?;
        DocumentChange::try_from(wire).map_err(serde::de::Error::custom)
    }
}
