mod common;

use action_primitives::{
    HighlightStyle, InteractionError, InteractionPrimitives, Outcome, SkipReason, Target,
};
use common::page;
use dom_query::memory::{DomEvent, ScrollModel};
use dom_query::{KeyInput, PointerGesture, QuerySelector, SpecialKey};

#[tokio::test(start_paused = true)]
async fn zero_match_targets_are_skipped_without_side_effects() {
    let page = page();
    let s = &page.session;
    let missing = Target::Named("missing");

    assert_eq!(s.click(missing, 0).await.unwrap(), Outcome::not_found());
    assert_eq!(s.double_click(missing, 0).await.unwrap(), Outcome::not_found());
    assert_eq!(s.scroll_into_view(missing, 0).await.unwrap(), Outcome::not_found());
    assert_eq!(s.type_text(missing, "x{Enter}", 0).await.unwrap(), Outcome::not_found());
    assert_eq!(
        s.drag_and_drop_text(missing, "x", 0).await.unwrap(),
        Outcome::not_found()
    );
    assert_eq!(s.highlight(missing, 0, None).await.unwrap(), Outcome::not_found());
    assert_eq!(s.ripple(missing, 0).await.unwrap(), Outcome::not_found());
    assert_eq!(s.set_value(missing, "x", 0).await.unwrap(), Outcome::not_found());

    // an index past the last match is a miss too
    assert_eq!(s.click(Target::Named("badge"), 2).await.unwrap(), Outcome::not_found());

    assert!(page.dom.events().is_empty());
    assert_eq!(page.dom.text(page.editor), "select 1");
}

#[tokio::test(start_paused = true)]
async fn unknown_logical_names_are_configuration_errors() {
    let page = page();
    let err = page
        .session
        .click(Target::Named("cancel_button"), 0)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InteractionError::UnknownSelector {
            name: "cancel_button".into()
        }
    );
    assert!(err.is_configuration());
}

#[tokio::test(start_paused = true)]
async fn click_targets_the_indexed_match() {
    let page = page();
    let outcome = page.session.click(Target::Named("badge"), 1).await.unwrap();
    assert!(outcome.is_performed());
    assert_eq!(
        page.dom.events(),
        vec![DomEvent::Pointer {
            node: page.second,
            gesture: PointerGesture::Click
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn raw_selectors_work_without_the_map() {
    let page = page();
    let selector = QuerySelector::text("Run");
    let outcome = page.session.click(Target::from(&selector), 0).await.unwrap();
    assert!(outcome.is_performed());
    assert_eq!(page.dom.focused(), Some(page.run_button));
}

#[tokio::test(start_paused = true)]
async fn elements_without_pointer_events_are_not_clicked() {
    let page = page();
    let outcome = page
        .session
        .double_click(Target::Named("disabled_button"), 0)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::NotInteractable));
    assert!(page.dom.events().is_empty());
    assert_eq!(page.dom.focused(), None);
}

#[tokio::test(start_paused = true)]
async fn highlight_toggles_back_to_the_original_style() {
    let page = page();
    let badge = Target::Named("badge");

    page.session.highlight(badge, 0, None).await.unwrap();
    assert_eq!(
        page.dom.inline_style_of(page.first, "border").as_deref(),
        Some("1px solid red")
    );
    assert_eq!(
        page.session.highlighted_element().await,
        Some(page.first.handle())
    );

    page.session.highlight(badge, 0, None).await.unwrap();
    assert_eq!(
        page.dom.inline_style_of(page.first, "border").as_deref(),
        Some("2px solid blue")
    );
    assert_eq!(page.session.highlighted_element().await, None);
}

#[tokio::test(start_paused = true)]
async fn highlighting_a_second_element_restores_the_first() {
    let page = page();
    let badge = Target::Named("badge");

    page.session.highlight(badge, 0, None).await.unwrap();
    page.session.highlight(badge, 1, None).await.unwrap();

    assert_eq!(
        page.dom.inline_style_of(page.first, "border").as_deref(),
        Some("2px solid blue")
    );
    assert_eq!(
        page.dom.inline_style_of(page.second, "border").as_deref(),
        Some("1px solid red")
    );
    assert_eq!(
        page.session.highlighted_element().await,
        Some(page.second.handle())
    );

    assert!(page.session.clear_highlight().await.unwrap().is_performed());
    assert_eq!(page.dom.inline_style_of(page.second, "border"), None);
    assert_eq!(page.session.clear_highlight().await.unwrap(), Outcome::not_found());
}

#[tokio::test(start_paused = true)]
async fn highlight_accepts_style_overrides() {
    let page = page();
    let style = HighlightStyle::new()
        .with("outline", "3px dashed green")
        .with("background-color", "yellow");
    page.session
        .highlight(Target::Named("editor"), 0, Some(&style))
        .await
        .unwrap();
    assert_eq!(
        page.dom.inline_style_of(page.editor, "outline").as_deref(),
        Some("3px dashed green")
    );
    assert_eq!(page.dom.inline_style_of(page.editor, "border"), None);

    page.session.clear_highlight().await.unwrap();
    assert_eq!(page.dom.inline_style_of(page.editor, "outline"), None);
    assert_eq!(page.dom.inline_style_of(page.editor, "background-color"), None);
}

fn scroll_count(events: &[DomEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, DomEvent::Scroll { .. }))
        .count()
}

#[tokio::test(start_paused = true)]
async fn scroll_stops_once_the_element_settles() {
    let page = page();
    let outcome = page
        .session
        .scroll_into_view(Target::Named("far"), 0)
        .await
        .unwrap();
    assert!(outcome.is_performed());
    assert_eq!(scroll_count(&page.dom.events()), 2);
    assert_eq!(page.dom.rect_of(page.far).top(), 390.0);
}

#[tokio::test(start_paused = true)]
async fn scroll_skips_elements_already_in_view() {
    let page = page();
    page.session
        .scroll_into_view(Target::Named("editor"), 0)
        .await
        .unwrap();
    assert_eq!(scroll_count(&page.dom.events()), 0);
}

#[tokio::test(start_paused = true)]
async fn scroll_gives_up_after_the_attempt_budget() {
    let page = page();
    page.dom.set_scroll_model(ScrollModel::Drift { step: 50.0 });

    let started = tokio::time::Instant::now();
    let outcome = page
        .session
        .scroll_into_view(Target::Named("far"), 0)
        .await
        .unwrap();
    assert!(outcome.is_performed());
    assert_eq!(scroll_count(&page.dom.events()), 10);
    assert_eq!(started.elapsed(), std::time::Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn scroll_reveals_hidden_elements_first() {
    let page = page();
    page.session
        .scroll_into_view(Target::Named("hidden"), 0)
        .await
        .unwrap();
    assert_eq!(
        page.dom.inline_style_of(page.hidden, "display").as_deref(),
        Some("block")
    );
    assert!(scroll_count(&page.dom.events()) >= 1);
}

#[tokio::test(start_paused = true)]
async fn type_text_focuses_and_replays_special_keys() {
    let page = page();
    page.session
        .type_text(Target::Named("editor"), " + 1{Backspace}2{Enter}", 0)
        .await
        .unwrap();
    assert_eq!(page.dom.text(page.editor), "select 1 + 2");
    assert_eq!(
        page.dom.events(),
        vec![DomEvent::Keys {
            node: Some(page.editor),
            keys: vec![
                KeyInput::Text(" + 1".into()),
                KeyInput::Key(SpecialKey::Backspace),
                KeyInput::Text("2".into()),
                KeyInput::Key(SpecialKey::Enter),
            ],
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn select_all_acts_on_the_focused_surface() {
    let page = page();
    page.session.click(Target::Named("editor"), 0).await.unwrap();
    page.session.select_all_text(true).await.unwrap();
    assert_eq!(page.dom.text(page.editor), "");
}

#[tokio::test(start_paused = true)]
async fn port_failures_become_skips() {
    let page = page();
    page.dom.set_unavailable(true);

    let outcome = page.session.select_all_text(false).await.unwrap();
    assert!(matches!(outcome, Outcome::Skipped(SkipReason::PortError(_))));

    // resolution absorbs the failure as a miss
    let outcome = page.session.click(Target::Named("editor"), 0).await.unwrap();
    assert_eq!(outcome, Outcome::not_found());
}

#[tokio::test(start_paused = true)]
async fn targets_are_resolved_again_on_every_call() {
    let page = page();
    let badge = Target::Named("badge");

    page.session.click(badge, 0).await.unwrap();
    page.dom.remove(page.first);
    page.session.click(badge, 0).await.unwrap();

    // the remaining badge became index 0
    assert_eq!(
        page.dom.events(),
        vec![
            DomEvent::Pointer {
                node: page.first,
                gesture: PointerGesture::Click
            },
            DomEvent::Pointer {
                node: page.second,
                gesture: PointerGesture::Click
            },
        ]
    );
    assert_eq!(page.dom.query_count(&QuerySelector::css("span.badge")), 2);
}
