//! Paginated mandi price table

use krishi_core::MandiRow;
use krishi_state::{PageControl, Paginator};
use leptos::prelude::*;

/// Which way a pager button moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Prev,
    Next,
    To(usize),
}

/// Mandi rows of the current page plus the pager
#[component]
pub fn MandiTable(table: RwSignal<Paginator<MandiRow>>) -> impl IntoView {
    let rows = move || {
        table.with(|t| {
            t.page()
                .iter()
                .map(|row| view! { <MandiTableRow row=row.clone() /> })
                .collect_view()
        })
    };

    let on_move = Callback::new(move |step: PageMove| {
        table.update(|t| {
            match step {
                PageMove::Prev => t.prev(),
                PageMove::Next => t.next(),
                PageMove::To(page) => t.go_to(page),
            };
        });
    });

    view! {
        <div class="mandi-table">
            <table>
                <thead>
                    <tr>
                        <th>"Market"</th>
                        <th>"Commodity"</th>
                        <th>"Variety"</th>
                        <th>"Grade"</th>
                        <th>"Min Price"</th>
                        <th>"Max Price"</th>
                        <th>"Modal Price"</th>
                    </tr>
                </thead>
                <tbody id="mandi-data-table">{rows}</tbody>
            </table>
            <Pager
                controls=Signal::derive(move || table.with(|t| t.controls()))
                summary=Signal::derive(move || table.with(|t| t.summary()))
                can_prev=Signal::derive(move || table.with(|t| t.can_prev()))
                can_next=Signal::derive(move || table.with(|t| t.can_next()))
                on_move=on_move
            />
        </div>
    }
}

#[component]
fn MandiTableRow(row: MandiRow) -> impl IntoView {
    let [min, max, modal] = row.rupee_cells();

    view! {
        <tr>
            <td>{row.market.clone()}</td>
            <td>{row.commodity.clone()}</td>
            <td class="muted">{row.variety_label().to_string()}</td>
            <td class="muted">{row.grade_label().to_string()}</td>
            <td>{min}</td>
            <td>{max}</td>
            <td>{modal}</td>
        </tr>
    }
}

/// Page-number strip with prev/next and a "Showing a to b of n" line
#[component]
pub fn Pager(
    #[prop(into)] controls: Signal<Vec<PageControl>>,
    #[prop(into)] summary: Signal<(usize, usize, usize)>,
    #[prop(into)] can_prev: Signal<bool>,
    #[prop(into)] can_next: Signal<bool>,
    on_move: Callback<PageMove>,
) -> impl IntoView {
    let buttons = move || {
        controls
            .get()
            .into_iter()
            .map(|control| match control {
                PageControl::Page { number, active } => view! {
                    <button
                        class=if active { "page-btn active" } else { "page-btn" }
                        on:click=move |_| on_move.run(PageMove::To(number))
                    >
                        {number}
                    </button>
                }
                .into_any(),
                PageControl::Ellipsis => view! { <span class="page-ellipsis">"..."</span> }.into_any(),
            })
            .collect_view()
    };

    view! {
        <div class="pager">
            <span class="pager-summary">
                {move || {
                    let (first, last, total) = summary.get();
                    format!("Showing {} to {} of {} entries", first, last, total)
                }}
            </span>
            <div class="pager-controls">
                <button
                    id="prevPageBtn"
                    disabled=move || !can_prev.get()
                    on:click=move |_| on_move.run(PageMove::Prev)
                >
                    "Previous"
                </button>
                <span id="pageNumbers">{buttons}</span>
                <button
                    id="nextPageBtn"
                    disabled=move || !can_next.get()
                    on:click=move |_| on_move.run(PageMove::Next)
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
