#![allow(dead_code)]

use std::sync::Arc;

use action_registry::Dispatcher;
use app_controllers::{bind_controller, AppProfile, Collaborators, ControllerContext};
use dom_query::memory::{ElementSpec, FixtureDom, NodeId};
use dom_query::{QuerySelector, Rect};

pub struct BiPage {
    pub dom: Arc<FixtureDom>,
    pub editor: NodeId,
    pub run_button: NodeId,
    pub indicator: NodeId,
    pub tbody: NodeId,
    pub error_box: NodeId,
}

impl BiPage {
    pub fn indicator_selector() -> QuerySelector {
        QuerySelector::xpath("//button[@aria-label='Cancel']")
    }

    /// The running indicator disappears right before its `nth` poll.
    pub fn finish_after(&self, nth: usize) {
        self.dom
            .remove_on_query(&Self::indicator_selector(), nth, self.indicator);
    }

    pub fn add_row(&self, cells: &[&str]) {
        let row = self.dom.append(self.tbody, ElementSpec::new("tr"));
        for cell in cells {
            self.dom.append(row, ElementSpec::new("td").text(*cell));
        }
    }

    pub fn show_error(&self, message: &str) {
        self.dom.append(
            self.error_box,
            ElementSpec::new("div").class("QueryError-message").text(message),
        );
    }

    pub fn context(&self) -> ControllerContext {
        ControllerContext::new(
            "bi",
            self.dom.clone(),
            AppProfile::embedded("bi").unwrap(),
        )
    }
}

pub fn bi_page() -> BiPage {
    let dom = Arc::new(FixtureDom::new());
    let body = dom.append(dom.root(), ElementSpec::new("body"));

    dom.append(
        body,
        ElementSpec::new("div")
            .attr("data-testid", "selected-database")
            .text("Warehouse"),
    );
    let ace = dom.append(body, ElementSpec::new("div").class("ace_editor"));
    let editor = dom.append(
        ace,
        ElementSpec::new("div")
            .class("ace_content")
            .text("SELECT 1")
            .rect(Rect::new(10.0, 100.0, 400.0, 200.0))
            .editable(),
    );
    let run_button = dom.append(
        body,
        ElementSpec::new("button")
            .attr("aria-label", "Get Answer")
            .text("Get Answer"),
    );
    let indicator = dom.append(
        body,
        ElementSpec::new("button")
            .attr("aria-label", "Cancel")
            .text("Cancel"),
    );
    let error_box = dom.append(body, ElementSpec::new("div").class("QueryError"));

    let table = dom.append(body, ElementSpec::new("table").class("TableInteractive"));
    let thead = dom.append(table, ElementSpec::new("thead"));
    let header = dom.append(thead, ElementSpec::new("tr"));
    for name in ["id", "name"] {
        dom.append(header, ElementSpec::new("th").text(name));
    }
    let tbody = dom.append(table, ElementSpec::new("tbody"));

    BiPage {
        dom,
        editor,
        run_button,
        indicator,
        tbody,
        error_box,
    }
}

pub fn dispatcher_for(ctx: ControllerContext, collaborators: &Collaborators) -> Dispatcher {
    Dispatcher::with_target(bind_controller(ctx, collaborators).unwrap())
}

pub struct SheetsPage {
    pub dom: Arc<FixtureDom>,
    pub name_box: NodeId,
    pub cell_editor: NodeId,
    pub active_cell: NodeId,
}

impl SheetsPage {
    pub fn context(&self) -> ControllerContext {
        ControllerContext::new(
            "sheets",
            self.dom.clone(),
            AppProfile::embedded("sheets").unwrap(),
        )
    }
}

pub fn sheets_page() -> SheetsPage {
    let dom = Arc::new(FixtureDom::new());
    let body = dom.append(dom.root(), ElementSpec::new("body"));
    let name_box = dom.append(
        body,
        ElementSpec::new("input")
            .id("t-name-box")
            .attr("value", "A1")
            .text("A1")
            .editable(),
    );
    let cell_editor = dom.append(
        body,
        ElementSpec::new("div").class("cell-input").editable(),
    );
    let active_cell = dom.append(
        body,
        ElementSpec::new("div")
            .class("active-cell-border")
            .style("border", "2px solid blue"),
    );
    SheetsPage {
        dom,
        name_box,
        cell_editor,
        active_cell,
    }
}
