//! v1 subscriber and topic operations.
//!
//! Bodies are untyped JSON; only the envelope is described.

use std::borrow::Cow;

use http::{Method, StatusCode};
use serde_json::Value;

use super::{JSON_MEDIA_TYPE, Operation, OperationRequest, ParamSpec, PathParams};

const IDEMPOTENCY_KEY: ParamSpec = ParamSpec::header(super::IDEMPOTENCY_KEY_HEADER);

pub static MARK_ACTION_AS_SEEN: Operation = Operation {
    id: "SubscribersV1Controller_markActionAsSeen",
    method: Method::POST,
    path: "/v1/subscribers/{subscriberId}/messages/{messageId}/actions/{type}",
    params: &[
        ParamSpec::path("messageId"),
        ParamSpec::path("type"),
        ParamSpec::path("subscriberId"),
        IDEMPOTENCY_KEY,
    ],
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::CREATED,
    summary: "Mark a message action as seen",
};

pub static GET_TOPIC_SUBSCRIBER: Operation = Operation {
    id: "TopicsV1Controller_getTopicSubscriber",
    method: Method::GET,
    path: "/v1/topics/{topicKey}/subscribers/{externalSubscriberId}",
    params: &[
        ParamSpec::path("topicKey"),
        ParamSpec::path("externalSubscriberId"),
        IDEMPOTENCY_KEY,
    ],
    request_media_type: None,
    success_status: StatusCode::OK,
    summary: "Check topic subscriber",
};

pub static DELETE_SUBSCRIBER_CREDENTIALS: Operation = Operation {
    id: "SubscribersV1Controller_deleteSubscriberCredentials",
    method: Method::DELETE,
    path: "/v1/subscribers/{subscriberId}/credentials/{providerId}",
    params: &[
        ParamSpec::path("subscriberId"),
        ParamSpec::path("providerId"),
        IDEMPOTENCY_KEY,
    ],
    request_media_type: None,
    success_status: StatusCode::NO_CONTENT,
    summary: "Delete provider credentials",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberMessageActionPath {
    pub subscriber_id: String,
    pub message_id: String,
    /// Action type, e.g. `primary` or `secondary`.
    pub action_type: String,
}

impl PathParams for SubscriberMessageActionPath {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "subscriberId" => &self.subscriber_id,
            "messageId" => &self.message_id,
            "type" => &self.action_type,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSubscriberPath {
    pub topic_key: String,
    pub external_subscriber_id: String,
}

impl PathParams for TopicSubscriberPath {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "topicKey" => Some(Cow::Borrowed(self.topic_key.as_str())),
            "externalSubscriberId" => Some(Cow::Borrowed(self.external_subscriber_id.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberCredentialsPath {
    pub subscriber_id: String,
    pub provider_id: String,
}

impl PathParams for SubscriberCredentialsPath {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "subscriberId" => Some(Cow::Borrowed(self.subscriber_id.as_str())),
            "providerId" => Some(Cow::Borrowed(self.provider_id.as_str())),
            _ => None,
        }
    }
}

pub fn mark_action_as_seen(
    path: SubscriberMessageActionPath,
    body: Value,
) -> OperationRequest<SubscriberMessageActionPath> {
    OperationRequest::new(&MARK_ACTION_AS_SEEN, path).with_body(body)
}

pub fn get_topic_subscriber(path: TopicSubscriberPath) -> OperationRequest<TopicSubscriberPath> {
    OperationRequest::new(&GET_TOPIC_SUBSCRIBER, path)
}

pub fn delete_subscriber_credentials(
    path: SubscriberCredentialsPath,
) -> OperationRequest<SubscriberCredentialsPath> {
    OperationRequest::new(&DELETE_SUBSCRIBER_CREDENTIALS, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mark_action_path_fills_every_placeholder() {
        let request = mark_action_as_seen(
            SubscriberMessageActionPath {
                subscriber_id: "sub 1".into(),
                message_id: "msg_1".into(),
                action_type: "primary".into(),
            },
            json!({ "status": "done" }),
        );
        assert_eq!(
            request.render_path().unwrap(),
            "/v1/subscribers/sub%201/messages/msg_1/actions/primary"
        );
        assert_eq!(request.body_bytes().unwrap().unwrap(), br#"{"status":"done"}"#);
    }

    #[test]
    fn test_topic_subscriber_path() {
        let request = get_topic_subscriber(TopicSubscriberPath {
            topic_key: "news".into(),
            external_subscriber_id: "user@example.com".into(),
        });
        assert_eq!(
            request.render_path().unwrap(),
            "/v1/topics/news/subscribers/user%40example.com"
        );
    }
}
