use ui_engine::{
    ElementData, HoriAlign, ImageBox, ImageOverflow, LayoutTree, NodeId, Padding, Placement, Rect,
    Sizing, TextBox, TextOverflow, Texture, UiConfig, UiEngine, Vec2, VertAlign, WindowId,
    tree::resolve_shares,
};

const FULL_HD: Vec2 = Vec2::new(1920.0, 1080.0);

fn engine() -> UiEngine<()> {
    UiEngine::new(UiConfig::default(), FULL_HD)
}

/// A window holding one table with one row, returning the row.
fn single_row(ui: &mut UiEngine<()>, rect: Rect) -> (WindowId, NodeId) {
    let window = ui.create_window("test", rect, Placement::Floating, Padding::ZERO);
    let tree = ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::ZERO).unwrap();
    let row = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
    (window, row)
}

fn rects(tree: &LayoutTree<()>, ids: &[NodeId]) -> Vec<Rect> {
    ids.iter().map(|id| tree.rect(*id).unwrap()).collect()
}

#[test]
fn row_children_tile_the_available_width() {
    let mut ui = engine();
    let (window, row) = single_row(&mut ui, Rect::new(0.0, 0.0, 397.0, 120.0));
    let sizings = [
        Sizing::percent(25.0).unwrap(),
        Sizing::Auto,
        Sizing::Auto,
        Sizing::percent(10.0).unwrap(),
    ];
    let cells: Vec<NodeId> = sizings
        .iter()
        .map(|sizing| ui.tree_mut().add_cell(row, *sizing, Padding::ZERO).unwrap())
        .collect();
    ui.finalize_window(&mut (), window).unwrap();

    let rects = rects(ui.tree(), &cells);
    let total: f32 = rects.iter().map(|rect| rect.width).sum();
    assert!(total >= 397.0 && total < 397.0 + cells.len() as f32);
    assert_eq!(rects[0].x, 0.0);
    for pair in rects.windows(2) {
        assert_eq!(pair[0].right(), pair[1].x);
        assert_eq!(pair[0].overlap(&pair[1]), None);
    }
    assert!(rects.iter().all(|rect| rect.height == 120.0));
}

#[test]
fn over_subscribed_fixed_children_are_clamped_not_scaled() {
    let sizings = [Sizing::Percent(60.0), Sizing::Percent(60.0), Sizing::Auto];
    let shares = resolve_shares(&sizings);
    assert_eq!(shares.fixed_total, 100.0);
    assert_eq!(shares.auto_share, 0.0);

    let mut ui = engine();
    let (window, row) = single_row(&mut ui, Rect::new(0.0, 0.0, 200.0, 50.0));
    let cells: Vec<NodeId> = sizings
        .iter()
        .map(|sizing| ui.tree_mut().add_cell(row, *sizing, Padding::ZERO).unwrap())
        .collect();
    ui.finalize_window(&mut (), window).unwrap();

    let widths: Vec<f32> = rects(ui.tree(), &cells)
        .iter()
        .map(|rect| rect.width)
        .collect();
    assert_eq!(widths, vec![120.0, 120.0, 0.0]);
}

#[test]
fn padding_is_taken_off_before_children_are_placed() {
    let mut ui = engine();
    let window = ui.create_window(
        "padded",
        Rect::new(10.0, 20.0, 200.0, 100.0),
        Placement::Floating,
        Padding::uniform(10.0),
    );
    let tree = ui.tree_mut();
    let table = tree
        .add_table(window, Sizing::Auto, Padding::new(5.0, 5.0, 0.0, 0.0))
        .unwrap();
    let top = tree.add_row(table, Sizing::Percent(50.0), Padding::ZERO).unwrap();
    let bottom = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
    ui.finalize_window(&mut (), window).unwrap();

    assert_eq!(ui.tree().rect(table), Some(Rect::new(20.0, 30.0, 180.0, 80.0)));
    assert_eq!(ui.tree().rect(top), Some(Rect::new(20.0, 35.0, 180.0, 35.0)));
    assert_eq!(ui.tree().rect(bottom), Some(Rect::new(20.0, 70.0, 180.0, 35.0)));
}

#[test]
fn resizing_and_resizing_back_restores_every_rect() {
    let mut ui = engine();
    let config = ui.config().clone();
    let window = ui.create_window(
        "character",
        Rect::new(300.0, 200.0, 500.0, 400.0),
        Placement::Floating,
        Padding::uniform(8.0),
    );
    let docked = ui.create_window(
        "toolbar",
        Rect::new(0.0, 0.0, 600.0, 80.0),
        Placement::Docked {
            vert: VertAlign::Bottom,
            hori: HoriAlign::Center,
            offset: Vec2::new(0.0, -16.0),
        },
        Padding::uniform(4.0),
    );

    let tree = ui.tree_mut();
    let table = tree.add_table(window, Sizing::Auto, Padding::uniform(3.0)).unwrap();
    let title_row = tree.add_row(table, Sizing::Percent(15.0), Padding::ZERO).unwrap();
    let title = tree.add_cell(title_row, Sizing::Auto, Padding::ZERO).unwrap();
    tree.set_element(
        title,
        ElementData::text(
            TextBox::new("Character sheet", &config).aligned(VertAlign::Middle, HoriAlign::Center),
        ),
        None,
    )
    .unwrap();
    let body = tree.add_row(table, Sizing::Auto, Padding::uniform(2.0)).unwrap();
    let portrait = tree.add_cell(body, Sizing::Percent(40.0), Padding::ZERO).unwrap();
    tree.set_element(
        portrait,
        ElementData::image(ImageBox::new(
            Some(Texture::new("portrait", 256.0, 256.0)),
            ImageOverflow::ShrinkToFit,
        )),
        None,
    )
    .unwrap();
    let notes = tree.add_cell(body, Sizing::Auto, Padding::ZERO).unwrap();
    tree.set_element(
        notes,
        ElementData::text(
            TextBox::new("A seasoned warrior of the northern reaches", &config)
                .with_overflow(TextOverflow::WordWrap),
        ),
        None,
    )
    .unwrap();
    let toolbar = tree.add_table(docked, Sizing::Auto, Padding::ZERO).unwrap();
    let bar = tree
        .add_row_grid(toolbar, 6, 4.0, Sizing::Auto, Padding::ZERO)
        .unwrap();

    ui.finalize_window(&mut (), window).unwrap();
    ui.finalize_window(&mut (), docked).unwrap();
    let authored = ui.snapshot();
    let paddings: Vec<Padding> = ui
        .tree()
        .descendants(window)
        .iter()
        .map(|id| ui.tree().get(*id).unwrap().padding())
        .collect();

    ui.on_screen_resized(Vec2::new(1280.0, 720.0));
    assert_ne!(ui.snapshot(), authored);
    assert!(ui.tree().rect(bar).unwrap().width < 600.0);
    ui.on_screen_resized(Vec2::new(1366.0, 768.0));
    ui.on_screen_resized(FULL_HD);

    assert_eq!(ui.snapshot(), authored);
    let restored: Vec<Padding> = ui
        .tree()
        .descendants(window)
        .iter()
        .map(|id| ui.tree().get(*id).unwrap().padding())
        .collect();
    assert_eq!(restored, paddings);
}

#[test]
fn row_images_share_the_smallest_scale() {
    let mut ui = engine();
    let (window, row) = single_row(&mut ui, Rect::new(0.0, 0.0, 300.0, 100.0));
    let textures = [
        Texture::new("wide", 400.0, 200.0),
        Texture::new("square", 150.0, 150.0),
        Texture::new("tall", 100.0, 200.0),
    ];
    let cells: Vec<NodeId> = textures
        .into_iter()
        .map(|texture| {
            let tree = ui.tree_mut();
            let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();
            let image = ImageBox::new(Some(texture), ImageOverflow::ShrinkRowToFit);
            tree.set_element(cell, ElementData::image(image), None).unwrap();
            cell
        })
        .collect();
    ui.finalize_window(&mut (), window).unwrap();

    let scales: Vec<f32> = cells
        .iter()
        .map(|cell| ui.element(*cell).unwrap().image_box().unwrap().scale())
        .collect();
    assert_eq!(scales, vec![0.25, 0.25, 0.25]);
    assert_eq!(ui.element(cells[1]).unwrap().rect().size(), Vec2::new(37.5, 37.5));
}

#[test]
fn column_images_share_the_smallest_scale() {
    let mut ui = engine();
    let window = ui.create_window(
        "column",
        Rect::new(0.0, 0.0, 100.0, 200.0),
        Placement::Floating,
        Padding::ZERO,
    );
    let table = ui
        .tree_mut()
        .add_table(window, Sizing::Auto, Padding::ZERO)
        .unwrap();
    let mut cells = Vec::new();
    for texture in [Texture::new("banner", 200.0, 100.0), Texture::new("dot", 50.0, 50.0)] {
        let tree = ui.tree_mut();
        let row = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
        let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();
        let image = ImageBox::new(Some(texture), ImageOverflow::ShrinkColToFit);
        tree.set_element(cell, ElementData::image(image), None).unwrap();
        cells.push(cell);
    }
    ui.finalize_window(&mut (), window).unwrap();

    for cell in cells {
        assert_eq!(ui.element(cell).unwrap().image_box().unwrap().scale(), 0.5);
    }
}

#[test]
fn grid_cells_are_power_of_two_squares_centered_in_the_space() {
    let mut ui = engine();
    let window = ui.create_window(
        "bag",
        Rect::new(0.0, 0.0, 300.0, 100.0),
        Placement::Floating,
        Padding::ZERO,
    );
    let grid = ui
        .tree_mut()
        .add_grid(window, 1, 2, 4.0, Sizing::Auto, Padding::ZERO)
        .unwrap();
    ui.finalize_window(&mut (), window).unwrap();

    let tree = ui.tree();
    assert_eq!(
        tree.rect(tree.grid_cell(grid, 0, 0).unwrap()),
        Some(Rect::new(84.0, 18.0, 64.0, 64.0))
    );
    assert_eq!(
        tree.rect(tree.grid_cell(grid, 0, 1).unwrap()),
        Some(Rect::new(152.0, 18.0, 64.0, 64.0))
    );
}

#[test]
fn window_center_text_centers_on_the_window() {
    let mut ui = engine();
    let config = ui.config().clone();
    let (window, row) = single_row(&mut ui, Rect::new(0.0, 0.0, 400.0, 40.0));
    let tree = ui.tree_mut();
    let _spacer = tree.add_cell(row, Sizing::Percent(75.0), Padding::ZERO).unwrap();
    let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();
    let text = TextBox::new("Title", &config)
        .with_overflow(TextOverflow::None)
        .aligned(VertAlign::Top, HoriAlign::WindowCenter);
    tree.set_element(cell, ElementData::text(text), None).unwrap();
    ui.finalize_window(&mut (), window).unwrap();

    let rect = ui.element(cell).unwrap().rect();
    assert_eq!(rect.x + rect.width / 2.0, 200.0);
}

#[test]
fn snapshot_lists_windows_back_to_front() {
    let mut ui = engine();
    let (first, _) = single_row(&mut ui, Rect::new(0.0, 0.0, 100.0, 100.0));
    let (second, _) = single_row(&mut ui, Rect::new(50.0, 50.0, 100.0, 100.0));
    ui.finalize_window(&mut (), first).unwrap();
    ui.finalize_window(&mut (), second).unwrap();
    ui.bring_to_front(first);

    let snapshot = ui.snapshot();
    assert_eq!(snapshot.scale_factor, 1.0);
    assert_eq!(snapshot.windows.len(), 2);
    assert_eq!(snapshot.windows[1].root.rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(snapshot.windows[1].root.children[0].kind, "Table");
}
