use std::cell::RefCell;
use std::rc::Rc;

use ui_engine::{
    CellElement, CloseButton, DropOutcome, ElementCx, ElementData, ElementFlags, ImageBox,
    ImageOverflow, InteractionState, NodeId, Padding, Placement, Pointer, Rect, Sizing, Texture,
    TitleBar, UiConfig, UiEngine, UiHost, Vec2, WindowButton, WindowId,
};

#[derive(Default)]
struct TestHost {
    captured: bool,
}

impl UiHost for TestHost {
    type Payload = u32;

    fn capture_pointer(&mut self) {
        self.captured = true;
    }

    fn release_pointer(&mut self) {
        self.captured = false;
    }
}

type Log = Rc<RefCell<Vec<String>>>;

struct Probe {
    name: &'static str,
    payload: Option<u32>,
    log: Log,
}

impl CellElement<TestHost> for Probe {
    fn on_click(&mut self, _cx: &mut ElementCx<'_, TestHost>) {
        self.log.borrow_mut().push(format!("{} click", self.name));
    }

    fn payload(&self) -> Option<u32> {
        self.payload
    }

    fn receive_drop(&mut self, _cx: &mut ElementCx<'_, TestHost>, payload: &u32) {
        self.log
            .borrow_mut()
            .push(format!("{} received {payload}", self.name));
    }

    fn on_drop(&mut self, _cx: &mut ElementCx<'_, TestHost>, outcome: DropOutcome) {
        let outcome = match outcome {
            DropOutcome::Delivered { .. } => "delivered",
            DropOutcome::Rejected { .. } => "rejected",
            DropOutcome::NoReceiver => "no receiver",
        };
        self.log
            .borrow_mut()
            .push(format!("{} dropped: {outcome}", self.name));
    }
}

const DT: f32 = 0.1;

struct Fixture {
    ui: UiEngine<TestHost>,
    host: TestHost,
    log: Log,
}

impl Fixture {
    fn new() -> Self {
        Self {
            ui: UiEngine::new(UiConfig::default(), Vec2::new(1920.0, 1080.0)),
            host: TestHost::default(),
            log: Log::default(),
        }
    }

    fn icon() -> ElementData {
        ElementData::image(ImageBox::new(
            Some(Texture::new("icon", 32.0, 32.0)),
            ImageOverflow::ShrinkToFit,
        ))
    }

    /// One-row window with an auto-sized cell per element.
    fn window(
        &mut self,
        rect: Rect,
        elements: Vec<(ElementData, Option<Probe>)>,
    ) -> (WindowId, Vec<NodeId>) {
        let window = self
            .ui
            .create_window("window", rect, Placement::Floating, Padding::ZERO);
        let tree = self.ui.tree_mut();
        let table = tree.add_table(window, Sizing::Auto, Padding::ZERO).unwrap();
        let row = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
        let mut cells = Vec::new();
        for (data, probe) in elements {
            let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();
            let behavior = probe.map(|probe| Box::new(probe) as Box<dyn CellElement<TestHost>>);
            tree.set_element(cell, data, behavior).unwrap();
            cells.push(cell);
        }
        self.ui.finalize_window(&mut self.host, window).unwrap();
        (window, cells)
    }

    fn probe(&self, name: &'static str, payload: Option<u32>) -> Option<Probe> {
        Some(Probe {
            name,
            payload,
            log: Rc::clone(&self.log),
        })
    }

    fn frame(&mut self, pointer: Pointer) {
        self.ui.update(&mut self.host, pointer, DT);
    }

    fn drag(&mut self, from: Vec2, to: Vec2) {
        self.frame(Pointer::hover(from));
        self.frame(Pointer::press(from));
        self.frame(Pointer::hold(from));
        self.frame(Pointer::hold(to));
        self.frame(Pointer::release(to));
    }

    fn state(&self, cell: NodeId) -> InteractionState {
        self.ui.element(cell).unwrap().state()
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

/// Source, receiver and a plain cell, 100 px each.
fn drag_fixture() -> (Fixture, Vec<NodeId>) {
    let mut fx = Fixture::new();
    let elements = vec![
        (Fixture::icon().draggable(), fx.probe("source", Some(7))),
        (Fixture::icon().receives_drops(), fx.probe("receiver", None)),
        (Fixture::icon(), fx.probe("plain", None)),
    ];
    let (_, cells) = fx.window(Rect::new(0.0, 0.0, 300.0, 100.0), elements);
    (fx, cells)
}

#[test]
fn hover_then_release_is_a_click() {
    let mut fx = Fixture::new();
    let probe = fx.probe("button", None);
    let (_, cells) = fx.window(Rect::new(0.0, 0.0, 100.0, 100.0), vec![(Fixture::icon(), probe)]);
    let point = Vec2::new(50.0, 50.0);

    fx.frame(Pointer::hover(point));
    assert_eq!(fx.state(cells[0]), InteractionState::Hover);
    assert!(fx.host.captured);

    fx.frame(Pointer::press(point));
    fx.frame(Pointer::release(point));
    assert_eq!(fx.log(), ["button click"]);
    assert_eq!(fx.state(cells[0]), InteractionState::Idle);

    fx.frame(Pointer::hover(Vec2::new(500.0, 500.0)));
    assert!(!fx.host.captured);
}

#[test]
fn releasing_during_the_drag_delay_is_a_click_not_a_drag() {
    let (mut fx, cells) = drag_fixture();
    let point = Vec2::new(50.0, 50.0);

    fx.frame(Pointer::hover(point));
    fx.frame(Pointer::press(point));
    assert_eq!(fx.state(cells[0]), InteractionState::DragDelay);
    fx.frame(Pointer::release(point));

    assert_eq!(fx.log(), ["source click"]);
    assert_eq!(fx.ui.dragged(), None);
}

#[test]
fn holding_past_the_delay_starts_a_drag() {
    let (mut fx, cells) = drag_fixture();
    let point = Vec2::new(50.0, 50.0);

    fx.frame(Pointer::hover(point));
    fx.frame(Pointer::press(point));
    fx.frame(Pointer::hold(point));

    assert_eq!(fx.state(cells[0]), InteractionState::Drag);
    assert_eq!(fx.ui.dragged(), Some(cells[0]));
    assert!(fx.ui.element(cells[0]).unwrap().flags.contains(ElementFlags::BEING_DRAGGED));
}

#[test]
fn a_second_element_cannot_drag_while_another_holds_the_delay() {
    let mut fx = Fixture::new();
    let elements = vec![
        (Fixture::icon().draggable().with_drag_delay(10.0), fx.probe("slow", Some(1))),
        (Fixture::icon().draggable().with_drag_delay(0.0), fx.probe("fast", Some(2))),
    ];
    let (_, cells) = fx.window(Rect::new(0.0, 0.0, 200.0, 100.0), elements);
    let (slow_at, fast_at) = (Vec2::new(50.0, 50.0), Vec2::new(150.0, 50.0));

    fx.frame(Pointer::hover(slow_at));
    fx.frame(Pointer::press(slow_at));
    fx.frame(Pointer::hold(slow_at));
    assert_eq!(fx.state(cells[0]), InteractionState::DragDelay);

    fx.frame(Pointer::hold(fast_at));
    fx.frame(Pointer::hold(fast_at));
    assert_eq!(fx.state(cells[1]), InteractionState::DragDelay);
    fx.frame(Pointer::hold(fast_at));

    assert_eq!(fx.state(cells[1]), InteractionState::Idle);
    assert_eq!(fx.state(cells[0]), InteractionState::DragDelay);
    assert_eq!(fx.ui.dragged(), None);
}

#[test]
fn drop_on_a_receiver_delivers_exactly_once() {
    let (mut fx, cells) = drag_fixture();
    fx.drag(Vec2::new(50.0, 50.0), Vec2::new(150.0, 50.0));

    assert_eq!(fx.log(), ["receiver received 7", "source dropped: delivered"]);
    assert_eq!(fx.ui.dragged(), None);
    assert_eq!(fx.state(cells[0]), InteractionState::Idle);
    assert!(!fx.ui.element(cells[0]).unwrap().flags.contains(ElementFlags::BEING_DRAGGED));
}

#[test]
fn drop_on_a_cell_that_takes_no_drops_is_rejected() {
    let (mut fx, _) = drag_fixture();
    fx.drag(Vec2::new(50.0, 50.0), Vec2::new(250.0, 50.0));
    assert_eq!(fx.log(), ["source dropped: rejected"]);
}

#[test]
fn drop_outside_every_window_has_no_receiver() {
    let (mut fx, _) = drag_fixture();
    fx.drag(Vec2::new(50.0, 50.0), Vec2::new(900.0, 900.0));
    assert_eq!(fx.log(), ["source dropped: no receiver"]);
}

#[test]
fn drop_on_itself_is_rejected() {
    let (mut fx, _) = drag_fixture();
    fx.drag(Vec2::new(50.0, 50.0), Vec2::new(60.0, 60.0));
    assert_eq!(fx.log(), ["source dropped: rejected"]);
}

#[test]
fn locked_elements_never_leave_idle() {
    let (mut fx, cells) = drag_fixture();
    fx.ui.tree_mut().element_mut(cells[0]).unwrap().set_locked(true);

    fx.drag(Vec2::new(50.0, 50.0), Vec2::new(150.0, 50.0));
    assert_eq!(fx.state(cells[0]), InteractionState::Idle);
    assert_eq!(fx.ui.dragged(), None);
    assert!(fx.log().iter().all(|entry| !entry.starts_with("source")));
}

#[test]
fn the_topmost_window_owns_the_overlap() {
    let mut fx = Fixture::new();
    let back = fx.probe("back", None);
    let front = fx.probe("front", None);
    let (a, a_cells) = fx.window(Rect::new(0.0, 0.0, 200.0, 200.0), vec![(Fixture::icon(), back)]);
    let (b, b_cells) =
        fx.window(Rect::new(100.0, 100.0, 200.0, 200.0), vec![(Fixture::icon(), front)]);
    let overlap = Vec2::new(150.0, 150.0);

    assert!(fx.ui.is_obscured(a, overlap));
    assert_eq!(fx.ui.window_at(overlap), Some(b));
    assert_eq!(fx.ui.cell_at(overlap), Some(b_cells[0]));

    fx.frame(Pointer::hover(overlap));
    assert_eq!(fx.state(a_cells[0]), InteractionState::Idle);
    assert_eq!(fx.state(b_cells[0]), InteractionState::Hover);

    // Pressing where only A is visible brings A forward.
    fx.frame(Pointer::press(Vec2::new(50.0, 50.0)));
    assert_eq!(fx.ui.windows().last(), Some(&a));
    assert_eq!(fx.ui.cell_at(overlap), Some(a_cells[0]));
}

#[test]
fn removed_windows_linger_until_the_end_of_the_frame() {
    let mut fx = Fixture::new();
    let (window, _) = fx.window(Rect::new(0.0, 0.0, 100.0, 100.0), vec![]);
    let hidden = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hidden);
    let _hook = fx
        .ui
        .tree()
        .window(window)
        .unwrap()
        .on_hide()
        .subscribe(move |_| *counter.borrow_mut() += 1);

    fx.ui.remove_window(window).unwrap();
    assert!(fx.ui.tree().contains(window));
    assert!(!fx.ui.is_visible(window));
    assert_eq!(*hidden.borrow(), 1);

    fx.frame(Pointer::default());
    assert!(!fx.ui.tree().contains(window));
    assert!(fx.ui.windows().is_empty());
    assert!(fx.ui.show_window(window).unwrap_err().is_stale_id());
}

#[test]
fn tooltip_is_replaced_and_follows_its_parent() {
    let mut fx = Fixture::new();
    let (parent, _) = fx.window(Rect::new(0.0, 0.0, 100.0, 100.0), vec![]);

    let first = fx.ui.open_tooltip("tip", Rect::new(10.0, 10.0, 50.0, 20.0), Some(parent));
    let second = fx.ui.open_tooltip("tip", Rect::new(20.0, 20.0, 50.0, 20.0), Some(parent));
    assert!(!fx.ui.tree().contains(first));
    assert_eq!(fx.ui.tooltip(), Some(second));

    fx.ui.hide_window(parent).unwrap();
    assert_eq!(fx.ui.tooltip(), None);
    fx.frame(Pointer::default());
    assert!(!fx.ui.tree().contains(second));
}

#[test]
fn closing_a_pruned_tooltip_clears_it() {
    let mut fx = Fixture::new();
    let (parent, _) = fx.window(Rect::new(0.0, 0.0, 100.0, 100.0), vec![]);

    let stale = fx.ui.open_tooltip("tip", Rect::new(10.0, 10.0, 50.0, 20.0), Some(parent));
    fx.ui.tree_mut().remove(stale);
    fx.ui.close_tooltip(stale);
    fx.frame(Pointer::default());
    assert_eq!(fx.ui.tooltip(), None);

    let fresh = fx.ui.open_tooltip("tip", Rect::new(20.0, 20.0, 50.0, 20.0), Some(parent));
    fx.frame(Pointer::default());
    assert_eq!(fx.ui.tooltip(), Some(fresh));
}

#[test]
fn windows_are_clamped_to_the_viewport() {
    let mut fx = Fixture::new();
    let (window, _) = fx.window(Rect::new(0.0, 0.0, 200.0, 200.0), vec![]);

    fx.ui.set_window_pos(window, Vec2::new(1900.0, -50.0)).unwrap();
    assert_eq!(fx.ui.tree().rect(window), Some(Rect::new(1720.0, 0.0, 200.0, 200.0)));

    // The new position survives a resize.
    fx.ui.on_screen_resized(Vec2::new(960.0, 540.0));
    assert_eq!(fx.ui.tree().rect(window), Some(Rect::new(860.0, 0.0, 100.0, 100.0)));
}

#[test]
fn title_bar_drags_its_window() {
    let mut fx = Fixture::new();
    let window = fx.ui.create_window(
        "journal",
        Rect::new(100.0, 100.0, 300.0, 200.0),
        Placement::Floating,
        Padding::ZERO,
    );
    let tree = fx.ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::ZERO).unwrap();
    let title_row = tree.add_row(table, Sizing::Percent(20.0), Padding::ZERO).unwrap();
    let title = tree.add_cell(title_row, Sizing::Percent(90.0), Padding::ZERO).unwrap();
    let close = tree.add_cell(title_row, Sizing::Auto, Padding::ZERO).unwrap();
    TitleBar::install(&mut fx.ui, title, "Journal").unwrap();
    CloseButton::install(&mut fx.ui, close, false).unwrap();
    fx.ui.finalize_window(&mut fx.host, window).unwrap();

    fx.drag(Vec2::new(150.0, 110.0), Vec2::new(250.0, 210.0));
    assert_eq!(fx.ui.tree().rect(window).unwrap().position(), Vec2::new(200.0, 200.0));
    assert_eq!(fx.ui.tree().rect(title).unwrap().position(), Vec2::new(200.0, 200.0));

    let close_point = fx.ui.tree().rect(close).unwrap().position() + Vec2::new(5.0, 5.0);
    fx.frame(Pointer::hover(close_point));
    fx.frame(Pointer::release(close_point));
    assert_eq!(fx.ui.is_hidden(window), Ok(true));
}

#[test]
fn window_button_toggles_its_target() {
    let mut fx = Fixture::new();
    let (target, _) = fx.window(Rect::new(500.0, 500.0, 100.0, 100.0), vec![]);
    let bar = fx
        .ui
        .create_window("bar", Rect::new(0.0, 0.0, 100.0, 50.0), Placement::Floating, Padding::ZERO);
    let tree = fx.ui.tree_mut();
    let table = tree.add_table(bar, Sizing::Auto, Padding::ZERO).unwrap();
    let row = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
    let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();
    WindowButton::install(&mut fx.ui, cell, "Bag", target).unwrap();
    fx.ui.finalize_window(&mut fx.host, bar).unwrap();

    let point = Vec2::new(20.0, 20.0);
    fx.frame(Pointer::hover(point));
    fx.frame(Pointer::release(point));
    assert_eq!(fx.ui.is_hidden(target), Ok(true));

    fx.frame(Pointer::hover(point));
    fx.frame(Pointer::release(point));
    assert_eq!(fx.ui.is_hidden(target), Ok(false));
}

#[test]
fn error_banner_fades_then_clears() {
    let mut fx = Fixture::new();
    fx.ui.show_error("Out of range.");
    for _ in 0..25 {
        fx.frame(Pointer::default());
    }
    let banner = fx.ui.banner().unwrap();
    assert!((banner.alpha(fx.ui.now()) - 0.5).abs() < 1e-3);

    for _ in 0..6 {
        fx.frame(Pointer::default());
    }
    assert!(fx.ui.banner().is_none());
}

#[test]
fn hovered_images_are_highlighted() {
    let (mut fx, cells) = drag_fixture();
    fx.frame(Pointer::hover(Vec2::new(150.0, 50.0)));
    assert_eq!(fx.ui.element(cells[1]).unwrap().effect, Some(ui_engine::Effect::Highlight));
    fx.frame(Pointer::hover(Vec2::new(900.0, 50.0)));
    assert_eq!(fx.ui.element(cells[1]).unwrap().effect, None);
}
