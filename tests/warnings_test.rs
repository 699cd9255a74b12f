use dist_publish::warnings::PublishWarning;

// ============================================================================
// PublishWarning Display Tests
// ============================================================================

#[test]
fn test_secondary_tag_failed_display() {
    let warning = PublishWarning::SecondaryTagFailed {
        tag: "stable-2.3.0".to_string(),
        reason: "npm ERR! 403 Forbidden".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("stable-2.3.0"),
        "Message should contain the tag, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("403"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_vcs_unavailable_display() {
    let warning = PublishWarning::VcsUnavailable {
        reason: "could not find repository".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("could not find repository"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_dist_tag_query_failed_display() {
    let warning = PublishWarning::DistTagQueryFailed {
        tag: "next".to_string(),
        reason: "E404".to_string(),
    };

    assert_eq!(warning.to_string(), "Cannot read dist-tag 'next': E404");
}

#[test]
fn test_warnings_compare_by_value() {
    assert_eq!(PublishWarning::DetachedHead, PublishWarning::DetachedHead);
    assert_ne!(
        PublishWarning::DetachedHead,
        PublishWarning::VcsUnavailable {
            reason: String::new()
        }
    );
}
