//! Event API (AsyncAPI 3.0) description synthesis.
//!
//! The notification message schema is derived on its own and does not reuse
//! the HTTP feature schema. The two can drift apart when the global property
//! list changes.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::http_api::{Info, TypeSchema};
use crate::domain::{
    Collection, Filter, ProfileName,
    ident::{channel_name, display_title, pascal_name},
};

/// Version of the AsyncAPI document format emitted.
pub const ASYNCAPI_VERSION: &str = "3.0.0";

/// An AsyncAPI document describing the profile's notifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventApiDescription {
    /// AsyncAPI document format version.
    pub asyncapi: String,
    /// Document metadata.
    pub info: Info,
    /// Message brokers keyed by name.
    pub servers: IndexMap<String, Broker>,
    /// Channels keyed by name.
    pub channels: IndexMap<String, Channel>,
    /// Operations keyed by id.
    pub operations: IndexMap<String, EventOperation>,
    /// Reusable components.
    pub components: EventComponents,
}

/// A message broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broker {
    /// `host:port` of the broker.
    pub host: String,
    /// Messaging protocol.
    pub protocol: String,
    /// Free-text description.
    pub description: String,
}

/// A notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Topic address, e.g. `collections/water_gauge/items/#`.
    pub address: String,
    /// Free-text description.
    pub description: String,
    /// Subscription filters accepted by the channel.
    #[serde(rename = "x-ogc-subscription")]
    pub subscription: Subscription,
    /// Messages carried by the channel.
    pub messages: IndexMap<String, Reference>,
}

/// The `x-ogc-subscription` extension object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    /// Filters in declaration order.
    pub filters: Vec<SubscriptionFilter>,
}

/// A filter as published on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionFilter {
    /// Filter name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Value schema.
    pub schema: TypeSchema,
}

impl From<&Filter> for SubscriptionFilter {
    fn from(filter: &Filter) -> Self {
        Self {
            name: filter.name.clone(),
            description: filter.description.clone(),
            schema: TypeSchema {
                kind: filter.kind.clone(),
            },
        }
    }
}

/// A JSON reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// The referenced location.
    #[serde(rename = "$ref")]
    pub target: String,
}

impl Reference {
    fn to(target: String) -> Self {
        Self { target }
    }
}

/// An operation bound to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOperation {
    /// What the application does with the channel.
    pub action: Action,
    /// The channel operated on.
    pub channel: Reference,
    /// The channel messages involved.
    pub messages: Vec<Reference>,
}

/// Operation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The application receives messages.
    Receive,
}

/// Reusable event API components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventComponents {
    /// Message definitions keyed by name.
    pub messages: IndexMap<String, Message>,
}

/// A message definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// JSON schema of the message payload.
    pub payload: Value,
}

/// Synthesizes the event API description of a profile.
///
/// Each collection gets a notification channel carrying every filter, a
/// receive operation bound to it, and an observation message.
#[must_use]
#[instrument(level = "debug", skip_all, fields(profile = %profile))]
pub fn synthesize_event_api(
    profile: &ProfileName,
    collections: &[Collection],
    filters: &[Filter],
) -> EventApiDescription {
    let mut channels = IndexMap::new();
    let mut operations = IndexMap::new();
    let mut messages = IndexMap::new();

    let subscription = Subscription {
        filters: filters.iter().map(SubscriptionFilter::from).collect(),
    };

    for collection in collections {
        let name = &collection.name;
        let pascal = pascal_name(name);
        let channel = channel_name(name);
        let message_key = format!("{name}Update");
        let message_name = format!("{pascal}Observation");

        let mut channel_messages = IndexMap::new();
        channel_messages.insert(
            message_key.clone(),
            Reference::to(format!("#/components/messages/{message_name}")),
        );

        operations.insert(
            format!("receive{pascal}Update"),
            EventOperation {
                action: Action::Receive,
                channel: Reference::to(format!("#/channels/{channel}")),
                messages: vec![Reference::to(format!(
                    "#/channels/{channel}/messages/{message_key}"
                ))],
            },
        );

        channels.insert(
            channel,
            Channel {
                address: format!("collections/{name}/items/#"),
                description: format!("{} observation notifications", display_title(name)),
                subscription: subscription.clone(),
                messages: channel_messages,
            },
        );

        messages.insert(
            message_name,
            Message {
                payload: observation_payload(),
            },
        );
    }

    let names = collections
        .iter()
        .map(|collection| collection.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut servers = IndexMap::new();
    servers.insert(
        "production".to_string(),
        Broker {
            host: "localhost:5672".to_string(),
            protocol: "amqp".to_string(),
            description: "RabbitMQ broker".to_string(),
        },
    );

    EventApiDescription {
        asyncapi: ASYNCAPI_VERSION.to_string(),
        info: Info {
            title: format!("{} Profile AsyncAPI", profile.title()),
            version: "1.0.0".to_string(),
            description: format!("Real-time notifications for {names}"),
        },
        servers,
        channels,
        operations,
        components: EventComponents { messages },
    }
}

fn observation_payload() -> Value {
    json!({
        "type": "object",
        "required": ["type", "properties"],
        "properties": {
            "type": { "type": "string", "const": "Feature" },
            "properties": {
                "type": "object",
                "required": ["id", "timestamp"],
                "properties": {
                    "id": { "type": "string" },
                    "timestamp": { "type": "string", "format": "date-time" },
                },
            },
        },
    })
}
