// Session behaviour end to end: reply, navigation presses, idle expiry.
// Time is driven by tokio's paused clock.

mod common;

use std::time::Duration;

use common::{pages, settle, Recorder};
use goldfish_bot::model::{MessageId, UserId};
use goldfish_bot::pager::{
    reply, Affordances, NavAction, NavigationControl, NavigationEvent, PageSet, PagerError,
    ReplyError, ReplyOptions, SessionRegistry,
};

const VIEWER: UserId = UserId(11);
const STRANGER: UserId = UserId(22);

fn press(action: NavAction, actor: UserId) -> NavigationEvent {
    NavigationEvent { action, actor }
}

fn title(page: &goldfish_bot::pager::Page) -> &str {
    page.title.as_deref().unwrap_or_default()
}

async fn open(recorder: &Recorder, registry: &SessionRegistry, n: usize) -> MessageId {
    let sent = reply(registry, recorder, pages(n), VIEWER, &ReplyOptions::default())
        .await
        .unwrap();
    assert!(sent.interactive);
    sent.message
}

#[tokio::test(start_paused = true)]
async fn test_six_page_scenario() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 6).await;

    let sent = recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(title(&sent[0].0), "P0");
    assert_eq!(
        sent[0].1,
        Some(Affordances {
            first: false,
            prev: false,
            next: true,
            last: true,
        })
    );

    for _ in 0..5 {
        assert!(registry.dispatch(message, press(NavAction::Next, VIEWER)));
        settle().await;
    }
    let renders = recorder.renders();
    assert_eq!(renders.len(), 5);
    let (last_page, affordances) = renders.last().unwrap();
    assert_eq!(title(last_page), "P5");
    assert_eq!(
        *affordances,
        Affordances {
            first: true,
            prev: true,
            next: false,
            last: false,
        }
    );

    // Boundary press: nothing moves, nothing re-rendered.
    registry.dispatch(message, press(NavAction::Next, VIEWER));
    settle().await;
    assert_eq!(recorder.renders().len(), 5);

    registry.dispatch(message, press(NavAction::First, VIEWER));
    settle().await;
    let renders = recorder.renders();
    assert_eq!(renders.len(), 6);
    assert_eq!(title(&renders[5].0), "P0");
}

#[tokio::test(start_paused = true)]
async fn test_single_page_is_static() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();

    let sent = reply(&registry, &recorder, pages(1), VIEWER, &ReplyOptions::default())
        .await
        .unwrap();

    assert!(!sent.interactive);
    assert!(registry.is_empty());
    assert_eq!(recorder.sent()[0].1, None);

    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;
    assert!(recorder.strips().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_page_list_sends_nothing() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();

    let err = reply(&registry, &recorder, vec![], VIEWER, &ReplyOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReplyError::Pager(PagerError::InvalidArgument(_))
    ));
    assert!(recorder.effects().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reply_carries_content() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let options = ReplyOptions {
        content: Some("**Recent osu! Play for ben:**".into()),
        reply_to: Some(MessageId(5)),
    };

    reply(&registry, &recorder, pages(2), VIEWER, &options)
        .await
        .unwrap();
    assert_eq!(
        recorder.sent()[0].2.as_deref(),
        Some("**Recent osu! Play for ben:**")
    );
}

#[tokio::test(start_paused = true)]
async fn test_stranger_presses_are_ignored() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 3).await;

    for action in NavAction::ALL {
        registry.dispatch(message, press(action, STRANGER));
    }
    settle().await;
    assert!(recorder.renders().is_empty());

    // The owner's view is untouched: the first accepted press moves from P0.
    registry.dispatch(message, press(NavAction::Next, VIEWER));
    settle().await;
    assert_eq!(title(&recorder.renders()[0].0), "P1");
}

#[tokio::test(start_paused = true)]
async fn test_idle_timeout_strips_once_at_sixty_seconds() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 4).await;

    tokio::time::advance(Duration::from_secs(59)).await;
    settle().await;
    assert!(registry.is_active(message));
    assert!(recorder.strips().is_empty());

    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    assert!(!registry.is_active(message));
    let strips = recorder.strips();
    assert_eq!(strips.len(), 1);
    assert_eq!(title(&strips[0]), "P0");

    tokio::time::advance(Duration::from_secs(600)).await;
    settle().await;
    assert_eq!(recorder.strips().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_accepted_press_restarts_countdown() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 4).await;

    tokio::time::advance(Duration::from_secs(50)).await;
    registry.dispatch(message, press(NavAction::Last, VIEWER));
    settle().await;

    tokio::time::advance(Duration::from_secs(59)).await;
    settle().await;
    assert!(registry.is_active(message));
    assert!(recorder.strips().is_empty());

    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    let strips = recorder.strips();
    assert_eq!(strips.len(), 1);
    assert_eq!(title(&strips[0]), "P3");
}

#[tokio::test(start_paused = true)]
async fn test_ignored_presses_do_not_restart_countdown() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 4).await;

    tokio::time::advance(Duration::from_secs(30)).await;
    registry.dispatch(message, press(NavAction::Next, STRANGER));
    registry.dispatch(message, press(NavAction::Prev, VIEWER));
    settle().await;

    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;
    assert!(!registry.is_active(message));
    assert_eq!(recorder.strips().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_presses_after_expiry_are_dropped() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 2).await;

    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;

    assert!(!registry.dispatch(message, press(NavAction::Next, VIEWER)));
    settle().await;
    assert!(recorder.renders().is_empty());
    assert_eq!(recorder.strips().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_edits_are_swallowed() {
    let recorder = Recorder::failing_edits();
    let registry = SessionRegistry::new();
    let message = open(&recorder, &registry, 3).await;

    registry.dispatch(message, press(NavAction::Next, VIEWER));
    settle().await;
    registry.dispatch(message, press(NavAction::Next, VIEWER));
    settle().await;

    let renders = recorder.renders();
    assert_eq!(renders.len(), 2);
    assert_eq!(title(&renders[1].0), "P2");

    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(recorder.strips().len(), 1);
    assert!(!registry.is_active(message));
}

#[tokio::test(start_paused = true)]
async fn test_sessions_are_independent() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let a = open(&recorder, &registry, 3).await;
    let b = open(&recorder, &registry, 3).await;
    assert_ne!(a, b);
    assert_eq!(registry.len(), 2);

    registry.dispatch(a, press(NavAction::Last, VIEWER));
    settle().await;
    registry.dispatch(b, press(NavAction::Next, VIEWER));
    settle().await;

    let titles: Vec<String> = recorder
        .renders()
        .iter()
        .map(|(p, _)| title(p).to_string())
        .collect();
    assert_eq!(titles, vec!["P2", "P1"]);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_message_is_dropped() {
    let registry = SessionRegistry::new();
    assert!(!registry.dispatch(MessageId(404), press(NavAction::Next, VIEWER)));
}

#[tokio::test(start_paused = true)]
async fn test_replaced_session_leaves_new_controls_alone() {
    let recorder = Recorder::new();
    let registry = SessionRegistry::new();
    let message = MessageId(7);
    let control = || {
        NavigationControl::new(PageSet::new(pages(3)).unwrap(), VIEWER, message).unwrap()
    };

    registry.start(control(), recorder.handle(message));
    tokio::time::advance(Duration::from_secs(30)).await;
    registry.start(control(), recorder.handle(message));
    settle().await;

    // The first session's timer runs out while the second is still live.
    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;
    assert!(registry.is_active(message));
    assert!(recorder.strips().is_empty());

    registry.dispatch(message, press(NavAction::Next, VIEWER));
    settle().await;
    assert_eq!(title(&recorder.renders()[0].0), "P1");

    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;
    assert!(!registry.is_active(message));
    assert_eq!(recorder.strips().len(), 1);
}
