use std::sync::Arc;

use action_primitives::InteractionSession;
use dom_query::memory::{ElementSpec, FixtureDom, NodeId};
use dom_query::{QuerySelector, QuerySelectorMap, Rect};

#[allow(dead_code)]
pub struct Page {
    pub dom: Arc<FixtureDom>,
    pub session: InteractionSession,
    pub editor: NodeId,
    pub run_button: NodeId,
    pub disabled_button: NodeId,
    pub far: NodeId,
    pub hidden: NodeId,
    pub first: NodeId,
    pub second: NodeId,
}

pub fn selectors() -> QuerySelectorMap {
    QuerySelectorMap::new()
        .with("editor", QuerySelector::css(".editor"))
        .with("run_button", QuerySelector::xpath("//button[@id='run']"))
        .with("disabled_button", QuerySelector::css("#disabled"))
        .with("far", QuerySelector::css("#far"))
        .with("hidden", QuerySelector::css("#hidden"))
        .with("badge", QuerySelector::css("span.badge"))
        .with("running_indicator", QuerySelector::text("Cancel"))
        .with("missing", QuerySelector::css(".does-not-exist"))
}

pub fn page() -> Page {
    let dom = Arc::new(FixtureDom::new());
    let body = dom.append(dom.root(), ElementSpec::new("body"));
    let editor = dom.append(
        body,
        ElementSpec::new("div")
            .class("editor")
            .text("select 1")
            .rect(Rect::new(10.0, 100.0, 200.0, 40.0))
            .editable(),
    );
    let run_button = dom.append(body, ElementSpec::new("button").id("run").text("Run").at(160.0));
    let disabled_button = dom.append(
        body,
        ElementSpec::new("button")
            .id("disabled")
            .text("Save")
            .pointer_events(false),
    );
    let far = dom.append(body, ElementSpec::new("div").id("far").at(2000.0));
    let hidden = dom.append(
        body,
        ElementSpec::new("div")
            .id("hidden")
            .computed("display", "none")
            .at(1500.0),
    );
    let first = dom.append(
        body,
        ElementSpec::new("span")
            .class("badge")
            .style("border", "2px solid blue"),
    );
    let second = dom.append(body, ElementSpec::new("span").class("badge"));

    let session = InteractionSession::new(dom.clone(), selectors());
    Page {
        dom,
        session,
        editor,
        run_button,
        disabled_button,
        far,
        hidden,
        first,
        second,
    }
}
