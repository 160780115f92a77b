//! Push registration and foreground rendering flow tests.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use domain::models::{ColorClass, Icon, Permission, PermissionState, PushEnvelope};
use domain::services::{BackendApi, MockBackend, MockPrompt, MockPushTransport, PushTransport};
use safehome_client::push::foreground::handle_foreground_message;
use safehome_client::push::PushRegistrar;
use safehome_client::ui::{ToastKind, ToastStack};

fn rig(
    transport: MockPushTransport,
    backend: Arc<MockBackend>,
    prompt: MockPrompt,
    initial: Permission,
) -> (PushRegistrar, Arc<ToastStack>, Arc<PermissionState>) {
    let toasts = Arc::new(ToastStack::new());
    let permission = Arc::new(PermissionState::new(initial));
    let registrar = PushRegistrar::new(
        Arc::new(transport),
        backend,
        Arc::new(prompt),
        permission.clone(),
        toasts.clone(),
        "safehome-client/test (linux)",
    );
    (registrar, toasts, permission)
}

fn push_envelope(title: &str, pairs: &[(&str, &str)]) -> PushEnvelope {
    let mut envelope = PushEnvelope::default();
    envelope.notification.title = Some(title.to_string());
    envelope.data = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>();
    envelope
}

#[tokio::test]
async fn enable_flow_registers_exactly_once() {
    // default -> Enable -> granted -> messaging initializes -> token
    // obtained -> exactly one registration POST with that token.
    let backend = Arc::new(MockBackend::new());
    let (registrar, toasts, permission) = rig(
        MockPushTransport::with_token("fcm-tok-1"),
        backend.clone(),
        MockPrompt::granting(),
        Permission::Default,
    );

    let session = registrar.run().await.expect("messaging should initialize");
    assert_eq!(session.token, "fcm-tok-1");
    assert!(permission.is_granted());

    let registrations = backend.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].token, "fcm-tok-1");
    assert_eq!(registrations[0].device_type, "web");
    assert_eq!(registrations[0].device_name, "safehome-client/test (linux)");

    // The enable banner is gone; the confirmation toast is up.
    let active = toasts.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, ToastKind::Status);
    assert_eq!(active[0].body, "Notifications enabled!");
}

#[tokio::test]
async fn granted_permission_skips_the_banner() {
    let backend = Arc::new(MockBackend::new());
    let (registrar, toasts, _) = rig(
        MockPushTransport::with_token("fcm-tok-2"),
        backend.clone(),
        // The prompt must never fire; a granting prompt would be invisible
        // here, so use a denying one to catch an unexpected call.
        MockPrompt::denying(),
        Permission::Granted,
    );

    let session = registrar.run().await;
    assert!(session.is_some());
    assert_eq!(backend.registration_count(), 1);
    assert!(toasts.is_empty());
}

#[tokio::test]
async fn denied_decision_is_terminal_and_registers_nothing() {
    let backend = Arc::new(MockBackend::new());
    let (registrar, _, permission) = rig(
        MockPushTransport::with_token("tok"),
        backend.clone(),
        MockPrompt::denying(),
        Permission::Default,
    );

    assert!(registrar.run().await.is_none());
    assert_eq!(permission.current(), Permission::Denied);
    assert_eq!(backend.registration_count(), 0);
}

#[tokio::test]
async fn missing_token_stops_the_flow_quietly() {
    let backend = Arc::new(MockBackend::new());
    let (registrar, _, _) = rig(
        MockPushTransport::without_token(),
        backend.clone(),
        MockPrompt::granting(),
        Permission::Granted,
    );

    assert!(registrar.run().await.is_none());
    assert_eq!(backend.registration_count(), 0);
}

#[tokio::test]
async fn transport_failure_stops_before_registration() {
    let backend = Arc::new(MockBackend::new());
    let (registrar, _, _) = rig(
        MockPushTransport::failing(),
        backend.clone(),
        MockPrompt::granting(),
        Permission::Granted,
    );

    assert!(registrar.run().await.is_none());
    assert_eq!(backend.registration_count(), 0);
}

#[tokio::test]
async fn rejected_registration_is_not_retried_and_does_not_panic() {
    let backend = Arc::new(MockBackend::rejecting());
    let (registrar, _, _) = rig(
        MockPushTransport::with_token("tok"),
        backend.clone(),
        MockPrompt::granting(),
        Permission::Granted,
    );

    // Registration fails with {success: false}; the flow degrades silently
    // and still subscribes for foreground messages.
    let session = registrar.run().await;
    assert!(session.is_some());
    assert_eq!(backend.registration_count(), 1);
}

#[tokio::test]
async fn subscribed_messages_flow_to_the_renderer() {
    let transport = MockPushTransport::with_token("tok");
    transport.queue_message(push_envelope(
        "Unknown person at the door",
        &[
            ("type", "entry_alert"),
            ("is_known", "False"),
            ("action_required", "True"),
        ],
    ));

    let backend = Arc::new(MockBackend::new());
    let (registrar, toasts, _) = rig(
        transport,
        backend,
        MockPrompt::granting(),
        Permission::Granted,
    );

    let mut session = registrar.run().await.expect("session");
    let envelope = session.messages.recv().await.expect("queued message");
    handle_foreground_message(&toasts, envelope);

    let active = toasts.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, ToastKind::PushToast);
    assert_eq!(active[0].color, ColorClass::Danger);
    assert_eq!(active[0].icon, Some(Icon::PersonExclamation));
    let action = active[0].action.as_ref().expect("call to action");
    assert_eq!(action.href, "/entries");

    // The stream closes after the scripted messages drain.
    assert!(session.messages.recv().await.is_none());
}

#[tokio::test]
async fn foreground_classification_matrix() {
    let toasts = ToastStack::new();

    handle_foreground_message(
        &toasts,
        push_envelope("known", &[("type", "entry_alert"), ("is_known", "True")]),
    );
    handle_foreground_message(
        &toasts,
        push_envelope("unknown", &[("type", "entry_alert"), ("is_known", "true")]),
    );
    handle_foreground_message(
        &toasts,
        push_envelope("opened", &[("type", "door_action"), ("action", "door_opened")]),
    );
    handle_foreground_message(
        &toasts,
        push_envelope("closed", &[("type", "door_action"), ("action", "door_closed")]),
    );
    handle_foreground_message(&toasts, push_envelope("other", &[("type", "maintenance")]));

    let active = toasts.active();
    assert_eq!(active.len(), 5);

    assert_eq!(active[0].icon, Some(Icon::PersonCheck));
    assert_eq!(active[0].color, ColorClass::Success);

    // Lowercase "true" is not the wire literal; treated as unknown.
    assert_eq!(active[1].icon, Some(Icon::PersonExclamation));
    assert_eq!(active[1].color, ColorClass::Danger);

    assert_eq!(active[2].icon, Some(Icon::DoorOpen));
    assert_eq!(active[2].color, ColorClass::Success);

    assert_eq!(active[3].icon, Some(Icon::DoorClosed));
    assert_eq!(active[3].color, ColorClass::Danger);

    assert_eq!(active[4].icon, Some(Icon::InfoCircle));
    assert_eq!(active[4].color, ColorClass::Primary);

    // None of these carried action_required; no call-to-action links.
    assert!(active.iter().all(|t| t.action.is_none()));
}

#[tokio::test]
async fn unregister_failure_does_not_propagate() {
    let backend = Arc::new(MockBackend::failing());
    let result = backend.unregister_device("tok").await;
    assert!(result.is_err());

    // The shutdown path logs and swallows this error; mirror that here by
    // asserting the call was recorded despite failing.
    assert_eq!(backend.unregistered_tokens(), vec!["tok".to_string()]);
}

#[tokio::test]
async fn mock_transport_subscription_contract() {
    // Guard the contract the gateway implementation also follows: the
    // channel closes once the subscription ends.
    let transport = MockPushTransport::with_token("tok");
    let mut rx = transport.subscribe("tok").await.unwrap();
    assert!(rx.recv().await.is_none());
}
