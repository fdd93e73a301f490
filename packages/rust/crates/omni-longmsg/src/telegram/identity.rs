/// Split a `chat_id[:thread_id]` recipient into chat and forum thread.
///
/// ```
/// use omni_longmsg::parse_recipient_target;
///
/// assert_eq!(parse_recipient_target("-100123:42"), ("-100123", Some("42")));
/// assert_eq!(parse_recipient_target("777"), ("777", None));
/// ```
#[must_use]
pub fn parse_recipient_target(recipient: &str) -> (&str, Option<&str>) {
    match recipient.split_once(':') {
        Some((chat_id, thread_id)) if !chat_id.is_empty() && !thread_id.is_empty() => {
            (chat_id, Some(thread_id))
        }
        _ => (recipient, None),
    }
}
