//! Validation verdicts and their projection into status conditions

use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};
use netparams_api::v1::ConditionReason;
use netparams_api::{NetworkConditionReason, ParamSetConditionReason};
use std::fmt;

/// Outcome of a single validation
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict<R: ConditionReason> {
    Valid,
    Invalid(Rejection<R>),
}

/// Why a validation failed, with a message naming the offending field or
/// resource
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection<R: ConditionReason> {
    pub reason: R,
    pub message: String,
}

/// Verdict of GKENetworkParamSet self and cloud validation
pub type ParamSetVerdict = Verdict<ParamSetConditionReason>;
/// Verdict of Network to GKENetworkParamSet cross validation
pub type NetworkParamsVerdict = Verdict<NetworkConditionReason>;

impl<R: ConditionReason> Verdict<R> {
    /// Build a failed verdict
    pub fn invalid(reason: R, message: impl Into<String>) -> Self {
        Verdict::Invalid(Rejection {
            reason,
            message: message.into(),
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<R> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(rejection) => Some(rejection.reason),
        }
    }

    /// Project the verdict onto a status condition
    pub fn to_condition(&self) -> StatusCondition {
        match self {
            Verdict::Valid => StatusCondition {
                type_: R::CONDITION_TYPE,
                status: ConditionStatus::True,
                reason: R::READY_REASON,
                message: String::new(),
            },
            Verdict::Invalid(rejection) => StatusCondition {
                type_: R::CONDITION_TYPE,
                status: ConditionStatus::False,
                reason: rejection.reason.as_str(),
                message: rejection.message.clone(),
            },
        }
    }
}

/// Status of a condition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status condition derived from a verdict
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusCondition {
    pub type_: &'static str,
    pub status: ConditionStatus,
    pub reason: &'static str,
    pub message: String,
}

impl StatusCondition {
    /// Convert into the Kubernetes condition persisted on the resource
    pub fn into_k8s(self, observed_generation: Option<i64>, now: DateTime<Utc>) -> Condition {
        Condition {
            type_: self.type_.to_string(),
            status: self.status.to_string(),
            reason: self.reason.to_string(),
            message: self.message,
            observed_generation,
            last_transition_time: Time(now),
        }
    }
}

/// Set `new` in `conditions`, replacing any condition of the same type.
///
/// The existing `lastTransitionTime` is kept unless the status changed.
/// Returns whether the condition list changed.
pub fn set_status_condition(conditions: &mut Vec<Condition>, new: Condition) -> bool {
    let Some(existing) = conditions.iter_mut().find(|c| c.type_ == new.type_) else {
        conditions.push(new);
        return true;
    };

    let mut changed = false;
    if existing.status != new.status {
        existing.status = new.status;
        existing.last_transition_time = new.last_transition_time;
        changed = true;
    }
    if existing.reason != new.reason {
        existing.reason = new.reason;
        changed = true;
    }
    if existing.message != new.message {
        existing.message = new.message;
        changed = true;
    }
    if existing.observed_generation != new.observed_generation {
        existing.observed_generation = new.observed_generation;
        changed = true;
    }
    changed
}
