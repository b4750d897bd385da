/// User-facing notice sink. Hosts route these into their own toast or dialog surface.
pub trait Notifier {
    fn notify(&self, body: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, body: &str) {
        send(body);
    }
}

pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = notify_rust::Notification::new()
        .appname("CaptionKit")
        .summary("CaptionKit")
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}
