use crate::condition::ParamSetVerdict;
use netparams_api::ParamSetConditionReason;
use regex::Regex;
use std::sync::LazyLock;

// projects/PROJECT_ID/regions/REGION/networkAttachments/NETWORK_ATTACHMENT
static NETWORK_ATTACHMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"projects/([^/]+)/regions/([^/]+)/networkAttachments/([^/]+)")
        .expect("network attachment pattern is valid")
});

/// Check the format of a network attachment name
pub fn validate_network_attachment(network_attachment: &str) -> ParamSetVerdict {
    if !NETWORK_ATTACHMENT_RE.is_match(network_attachment) {
        return ParamSetVerdict::invalid(
            ParamSetConditionReason::NetworkAttachmentInvalid,
            format!(
                "invalid network attachment name: {:?}. Must match \
                 projects/PROJECT_ID/regions/REGION/networkAttachments/NETWORK_ATTACHMENT",
                network_attachment
            ),
        );
    }

    ParamSetVerdict::Valid
}
