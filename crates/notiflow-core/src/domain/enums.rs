//! Closed string enumerations of the wire model.
//!
//! Each enum carries its exact wire tags for both serde and strum, so
//! `Display`, `FromStr` and JSON all agree. `TAGS` lists the accepted values
//! in declaration order and feeds the normalization tables.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
            Display, EnumString, AsRefStr, IntoStaticStr, VariantNames, EnumIter,
        )]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $tag)]
                #[strum(serialize = $tag)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const TAGS: &'static [&'static str] = <Self as VariantNames>::VARIANTS;

            /// The wire value of this variant.
            pub fn as_tag(self) -> &'static str {
                self.into()
            }
        }
    };
}

closed_enum! {
    /// Discriminator of the step union.
    pub enum StepType {
        InApp => "in_app",
        Email => "email",
        Sms => "sms",
        Push => "push",
        Chat => "chat",
        Delay => "delay",
        Digest => "digest",
        Custom => "custom",
    }
}

closed_enum! {
    /// Where a workflow or step was authored.
    pub enum ResourceOrigin {
        NovuCloud => "novu-cloud",
        NovuCloudV1 => "novu-cloud-v1",
        External => "external",
    }
}

closed_enum! {
    pub enum WorkflowStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Error => "ERROR",
    }
}

closed_enum! {
    /// Time unit of delay and digest windows.
    pub enum TimeUnit {
        Seconds => "seconds",
        Minutes => "minutes",
        Hours => "hours",
        Days => "days",
        Weeks => "weeks",
        Months => "months",
    }
}

closed_enum! {
    pub enum DelayType {
        Regular => "regular",
    }
}

impl Default for DelayType {
    fn default() -> Self {
        Self::Regular
    }
}

closed_enum! {
    pub enum DigestType {
        Regular => "regular",
        Timed => "timed",
    }
}

closed_enum! {
    /// Editor an email body was authored with.
    pub enum EditorType {
        Block => "block",
        Html => "html",
    }
}

impl Default for EditorType {
    fn default() -> Self {
        Self::Block
    }
}

closed_enum! {
    /// UI surface that created a workflow (`__source`).
    pub enum WorkflowCreationSource {
        Editor => "editor",
        Dashboard => "dashboard",
        TemplateStore => "template_store",
        NotificationDirectory => "notification_directory",
        OnboardingDigestDemo => "onboarding_digest_demo",
        OnboardingInApp => "onboarding_in_app",
        EmptyState => "empty_state",
        Dropdown => "dropdown",
        OnboardingGetStarted => "onboarding_get_started",
        Bridge => "bridge",
    }
}

closed_enum! {
    pub enum SortDirection {
        Asc => "ASC",
        Desc => "DESC",
    }
}

closed_enum! {
    pub enum WorkflowSortField {
        CreatedAt => "createdAt",
        UpdatedAt => "updatedAt",
        Name => "name",
        LastTriggeredAt => "lastTriggeredAt",
    }
}

closed_enum! {
    pub enum RuntimeIssueType {
        MissingValue => "MISSING_VALUE",
        MaxLengthAccessed => "MAX_LENGTH_ACCESSED",
        WorkflowIdAlreadyExists => "WORKFLOW_ID_ALREADY_EXISTS",
        StepIdExists => "STEP_ID_EXISTS",
        PayloadValidation => "PAYLOAD_VALIDATION",
    }
}

closed_enum! {
    /// Problems found in a step's control values.
    pub enum ContentIssueType {
        IllegalVariableInControlValue => "ILLEGAL_VARIABLE_IN_CONTROL_VALUE",
        InvalidFilterArgInVariable => "INVALID_FILTER_ARG_IN_VARIABLE",
        MissingValue => "MISSING_VALUE",
        TierLimitExceeded => "TIER_LIMIT_EXCEEDED",
    }
}

closed_enum! {
    /// Problems with the provider integration behind a step.
    pub enum IntegrationIssueType {
        MissingIntegration => "MISSING_INTEGRATION",
        InboxNotConnected => "INBOX_NOT_CONNECTED",
    }
}

closed_enum! {
    /// Browsing context for an in-app redirect.
    pub enum RedirectTarget {
        SelfFrame => "_self",
        Blank => "_blank",
        Parent => "_parent",
        Top => "_top",
        UnfencedTop => "_unfencedTop",
    }
}
