//! Relayable Façade
//!
//! A relayable is an object attached to a parent (a comment on a post, a
//! like, a poll answer) that travels through the parent author's pod to
//! everyone else. Concrete types embed a [`RelayableCore`] and describe
//! themselves through [`RelayableType`]; every such type gets the signing,
//! verification and wire operations of [`Relayable`].

use std::collections::BTreeMap;

use federa_domain::{
    find_property, generate_guid, validate_guid, validate_identity, DomainError, PropertyKey,
    PropertyKind, PropertyMap, PropertySpec, RelatedEntity,
};
use serde_json::Value;

use crate::context::FederationContext;
use crate::error::{RelayError, Result};
use crate::parent::resolve_parent;
use crate::signature_data::{build_signature_data, SignatureOrder};
use crate::signatures::{SignatureKind, SignaturePair};
use crate::wire::{self, InboundFields, MarkupDocument};

pub const AUTHOR: &str = "author";
pub const GUID: &str = "guid";
pub const PARENT_GUID: &str = "parent_guid";
pub const PARENT_TYPE: &str = "parent_type";

/// Properties shared by every relayable.
pub const RELAYABLE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::required(AUTHOR, PropertyKind::Text).with_alias("diaspora_handle"),
    PropertySpec::required(GUID, PropertyKind::Guid),
    PropertySpec::required(PARENT_GUID, PropertyKind::Guid),
];

/// State shared by every relayable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayableCore {
    guid: String,
    author: String,
    parent_guid: String,
    parent: RelatedEntity,
    author_signature: Option<String>,
    parent_author_signature: Option<String>,
    wire_order: Option<Vec<PropertyKey>>,
    additional_data: BTreeMap<String, String>,
}

impl RelayableCore {
    /// Core of a locally created relayable. It uses the legacy signature
    /// order of its type and is signed on first serialization.
    pub fn new(guid: impl Into<String>, author: impl Into<String>, parent: RelatedEntity) -> Result<Self> {
        let guid = guid.into();
        let author = author.into();
        validate_guid(&guid)?;
        validate_identity(&author)?;
        parent.validate()?;

        Ok(Self {
            guid,
            author,
            parent_guid: parent.guid.clone(),
            parent,
            author_signature: None,
            parent_author_signature: None,
            wire_order: None,
            additional_data: BTreeMap::new(),
        })
    }

    /// Like [`new`](Self::new), with a fresh guid.
    pub fn generate(author: impl Into<String>, parent: RelatedEntity) -> Result<Self> {
        Self::new(generate_guid(), author, parent)
    }

    /// Attach an existing author signature. Empty strings count as unset.
    pub fn with_author_signature(mut self, signature: impl Into<String>) -> Self {
        self.author_signature = Some(signature.into()).filter(|s| !s.is_empty());
        self
    }

    /// Attach an existing parent author signature. Empty strings count as unset.
    pub fn with_parent_author_signature(mut self, signature: impl Into<String>) -> Self {
        self.parent_author_signature = Some(signature.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn parent_guid(&self) -> &str {
        &self.parent_guid
    }

    pub fn parent(&self) -> &RelatedEntity {
        &self.parent
    }

    pub fn author_signature(&self) -> Option<&str> {
        self.author_signature.as_deref()
    }

    pub fn parent_author_signature(&self) -> Option<&str> {
        self.parent_author_signature.as_deref()
    }

    /// Order the instance was received in, if it came from the wire.
    pub fn wire_order(&self) -> Option<&[PropertyKey]> {
        self.wire_order.as_deref()
    }

    /// Fields the running schema does not know, as received.
    pub fn additional_data(&self) -> &BTreeMap<String, String> {
        &self.additional_data
    }
}

/// Descriptor implemented by each concrete relayable type.
pub trait RelayableType: Sized {
    /// Type name used for parent lookups and labels, e.g. `Comment`
    const ENTITY_TYPE: &'static str;
    /// Root element / `entity_type` on the wire, e.g. `comment`
    const WIRE_NAME: &'static str;
    /// Type-specific properties
    const PROPERTIES: &'static [PropertySpec];
    /// Signature order for instances that were never on the wire
    const LEGACY_SIGNATURE_ORDER: &'static [&'static str];
    /// Parent type when the wire carries no `parent_type`
    const PARENT_TYPE: Option<&'static str>;

    fn core(&self) -> &RelayableCore;

    fn core_mut(&mut self) -> &mut RelayableCore;

    /// Values of the type-specific properties. Absent optional values are
    /// left out.
    fn properties(&self) -> PropertyMap;

    /// Build an instance from a core and parsed type-specific properties.
    /// Required properties are guaranteed present.
    fn from_properties(core: RelayableCore, properties: PropertyMap) -> Result<Self>;

    /// Property a wire name refers to, shared or type-specific.
    fn known_property(wire_name: &str) -> Option<&'static PropertySpec> {
        find_property(RELAYABLE_PROPERTIES, wire_name)
            .or_else(|| find_property(Self::PROPERTIES, wire_name))
    }
}

/// Operations every relayable type gets.
pub trait Relayable {
    /// Diagnostic label: `Type:guid:parent_type:parent_guid`
    fn entity_label(&self) -> String;

    fn signature_order(&self) -> SignatureOrder<'_>;

    /// Wire strings of all signed values: shared and type-specific
    /// properties plus additional data.
    fn signable_values(&self) -> BTreeMap<&str, String>;

    /// The canonical string both signatures are made over.
    fn signature_data(&self) -> String;

    /// Whether `sender` may deliver this relayable.
    fn sender_valid(&self, sender: &str) -> bool;

    /// Fill in missing signatures and return the pair to emit.
    fn sign(&mut self, ctx: &FederationContext) -> Result<SignaturePair>;

    fn verify_signatures(&self, ctx: &FederationContext) -> Result<()>;

    fn to_markup(&mut self, ctx: &FederationContext) -> Result<MarkupDocument>;

    fn to_json(&mut self, ctx: &FederationContext) -> Result<Value>;
}

impl<T: RelayableType> Relayable for T {
    fn entity_label(&self) -> String {
        let core = self.core();
        format!(
            "{}:{}:{}:{}",
            T::ENTITY_TYPE,
            core.guid,
            core.parent.entity_type,
            core.parent_guid
        )
    }

    fn signature_order(&self) -> SignatureOrder<'_> {
        match &self.core().wire_order {
            Some(order) => SignatureOrder::Wire(order),
            None => SignatureOrder::Legacy(T::LEGACY_SIGNATURE_ORDER),
        }
    }

    fn signable_values(&self) -> BTreeMap<&str, String> {
        let core = self.core();
        let mut values: BTreeMap<&str, String> = core
            .additional_data
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect();

        values.insert(AUTHOR, core.author.clone());
        values.insert(GUID, core.guid.clone());
        values.insert(PARENT_GUID, core.parent_guid.clone());
        for (name, value) in self.properties() {
            values.insert(name, value.to_wire_string());
        }
        values
    }

    fn signature_data(&self) -> String {
        build_signature_data(&self.signable_values(), self.signature_order())
    }

    fn sender_valid(&self, sender: &str) -> bool {
        let core = self.core();
        sender == core.author || sender == core.parent.author
    }

    fn sign(&mut self, ctx: &FederationContext) -> Result<SignaturePair> {
        let label = self.entity_label();
        let data = self.signature_data();
        let engine = ctx.signatures();
        let core = self.core_mut();

        let author_signature = match core.author_signature.clone() {
            Some(signature) => signature,
            None => {
                let signature = engine.sign_as_author(&core.author, &data, &label)?;
                core.author_signature = Some(signature.clone());
                signature
            }
        };

        // Not stored when the key is missing: a later call tries again.
        let parent_author_signature = match core.parent_author_signature.clone() {
            Some(signature) => signature,
            None => match engine.sign_as_parent_author_if_available(&core.parent.author, &data, &label) {
                Some(signature) => {
                    core.parent_author_signature = Some(signature.clone());
                    signature
                }
                None => String::new(),
            },
        };

        Ok(SignaturePair {
            author_signature,
            parent_author_signature,
        })
    }

    fn verify_signatures(&self, ctx: &FederationContext) -> Result<()> {
        let label = self.entity_label();
        let data = self.signature_data();
        let engine = ctx.signatures();
        let core = self.core();

        engine.verify(
            SignatureKind::Author,
            &core.author,
            core.author_signature.as_deref(),
            &data,
            &label,
        )?;

        if !core.parent.local {
            engine.verify(
                SignatureKind::ParentAuthor,
                &core.parent.author,
                core.parent_author_signature.as_deref(),
                &data,
                &label,
            )?;
        }

        Ok(())
    }

    fn to_markup(&mut self, ctx: &FederationContext) -> Result<MarkupDocument> {
        let signatures = self.sign(ctx)?;
        Ok(wire::render_markup(
            T::WIRE_NAME,
            &self.signature_order().names(),
            &self.signable_values(),
            &signatures,
        ))
    }

    fn to_json(&mut self, ctx: &FederationContext) -> Result<Value> {
        let signatures = self.sign(ctx)?;
        Ok(wire::render_json(
            T::WIRE_NAME,
            &self.signature_order().names(),
            &self.signable_values(),
            &signatures,
        ))
    }
}

/// Parse, resolve and verify a relayable from its markup form.
pub fn parse_markup<T: RelayableType>(ctx: &FederationContext, document: &MarkupDocument) -> Result<T> {
    let (fields, order) = wire::markup_fields(document, T::WIRE_NAME)?;
    let inbound = InboundFields::classify(fields, Some(order), canonical_name::<T>);
    from_inbound(ctx, inbound)
}

/// Parse, resolve and verify a relayable from its structured form.
pub fn parse_json<T: RelayableType>(ctx: &FederationContext, payload: &Value) -> Result<T> {
    let (fields, order) = wire::json_fields(payload, T::WIRE_NAME)?;
    let inbound = InboundFields::classify(fields, order, canonical_name::<T>);
    from_inbound(ctx, inbound)
}

/// [`parse_json`] on raw JSON text.
pub fn parse_json_str<T: RelayableType>(ctx: &FederationContext, payload: &str) -> Result<T> {
    let payload: Value = serde_json::from_str(payload)?;
    parse_json(ctx, &payload)
}

fn canonical_name<T: RelayableType>(wire_name: &str) -> Option<&'static str> {
    T::known_property(wire_name).map(|spec| spec.name)
}

fn from_inbound<T: RelayableType>(ctx: &FederationContext, mut inbound: InboundFields) -> Result<T> {
    let parent_type = inbound
        .lookup(PARENT_TYPE)
        .or(T::PARENT_TYPE)
        .map(str::to_string)
        .ok_or_else(|| RelayError::Validation(format!("missing {PARENT_TYPE} for {}", T::ENTITY_TYPE)))?;

    let guid = take_required(&mut inbound, GUID, PropertyKind::Guid)?;
    let author = take_required(&mut inbound, AUTHOR, PropertyKind::Text)?;
    let parent_guid = take_required(&mut inbound, PARENT_GUID, PropertyKind::Guid)?;
    validate_identity(&author)?;

    let mut properties = PropertyMap::new();
    for spec in T::PROPERTIES {
        match inbound.known.remove(spec.name) {
            Some(raw) => {
                properties.insert(spec.name, spec.kind.parse(spec.name, &raw)?);
            }
            None if spec.required => {
                return Err(DomainError::MissingProperty(spec.name.to_string()).into())
            }
            None => {}
        }
    }

    let parent = resolve_parent(ctx, &author, &parent_type, &parent_guid)?;

    let core = RelayableCore {
        guid,
        author,
        parent_guid,
        parent,
        author_signature: inbound.author_signature,
        parent_author_signature: inbound.parent_author_signature,
        wire_order: inbound.order,
        additional_data: inbound.additional,
    };
    let entity = T::from_properties(core, properties)?;

    if let Err(err) = entity.verify_signatures(ctx) {
        tracing::warn!(
            event = "receive",
            status = "rejected",
            obj = %entity.entity_label(),
            error = %err,
            "Relayable rejected"
        );
        return Err(err);
    }

    tracing::info!(
        event = "receive",
        status = "complete",
        obj = %entity.entity_label(),
        additional_fields = entity.core().additional_data.len(),
        "Relayable verified"
    );

    Ok(entity)
}

fn take_required(inbound: &mut InboundFields, name: &'static str, kind: PropertyKind) -> Result<String> {
    let raw = inbound
        .known
        .remove(name)
        .ok_or_else(|| DomainError::MissingProperty(name.to_string()))?;
    kind.parse(name, &raw)?;
    Ok(raw)
}
