pub mod config;
pub mod heatmap;
pub mod map;
pub mod scatter;
pub mod utils;

use std::cell::RefCell;
use std::rc::Rc;
use slint::ComponentHandle;
use openstreetmap::Viewport;
use ucd_deltat::{DeltaTVariable, SelectionChange, Session, View};
use crate::MainWindow;

/// Wire the dropdowns and the map click to the session. Each input becomes a
/// [`SelectionChange`]; the session says which view to redraw.
pub fn setup_callbacks(main_window: &MainWindow, session: Rc<RefCell<Session>>, viewport: Viewport) {
    let main_window_weak = main_window.as_weak();
    let variable_session = session.clone();
    main_window.on_variable_selected(move |index| {
        debug!("Variable dropdown changed to index {}", index);
        let Some(variable) = usize::try_from(index).ok().and_then(|i| DeltaTVariable::ALL.get(i).copied()) else {
            warn!("Ignoring out of range variable index {}", index);
            return;
        };
        if let Some(window) = main_window_weak.upgrade() {
            let view = variable_session.borrow_mut().apply(SelectionChange::Variable(variable));
            refresh(&window, &variable_session.borrow(), view, &viewport);
        }
    });

    let main_window_weak2 = main_window.as_weak();
    let region_session = session.clone();
    main_window.on_region_selected(move |index| {
        debug!("Region dropdown changed to index {}", index);
        let region_name = {
            let session = region_session.borrow();
            usize::try_from(index)
                .ok()
                .and_then(|i| session.datasets().region_names().get(i).cloned())
        };
        let Some(region_name) = region_name else {
            warn!("Ignoring out of range region index {}", index);
            return;
        };
        if let Some(window) = main_window_weak2.upgrade() {
            let view = region_session.borrow_mut().apply(SelectionChange::Region(region_name));
            refresh(&window, &region_session.borrow(), view, &viewport);
        }
    });

    let main_window_weak3 = main_window.as_weak();
    main_window.on_map_clicked(move |fx, fy| {
        if let Some(window) = main_window_weak3.upgrade() {
            heatmap::handle_map_click(&window, &session.borrow(), &viewport, fx, fy);
        }
    });
}

/// Redraw the one view whose inputs changed
pub fn refresh(main_window: &MainWindow, session: &Session, view: View, viewport: &Viewport) {
    match view {
        View::Map => heatmap::show_map(main_window, session, viewport),
        View::Chart => scatter::show_chart(main_window, session),
    }
}
