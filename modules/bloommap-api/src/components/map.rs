use dioxus::prelude::*;

use bloommap_common::Species;
use bloommap_forecast::{BloomTier, Position, Projection, ViewKind};
use url::form_urlencoded;

use super::layout::Layout;
use super::{PredictionDetailView, SpeciesTab, UserView};
use crate::templates::{render_to_html, script_json};

const LEGEND: [BloomTier; 5] = [
    BloomTier::Imminent,
    BloomTier::Soon,
    BloomTier::Upcoming,
    BloomTier::Distant,
    BloomTier::Passed,
];

const MAP_SCRIPT: &str = r#"
const data = window.BLOOM_MAP;
const map = L.map('map').setView([36.5, 127.8], 7);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors',
    maxZoom: 18,
}).addTo(map);

const esc = s => String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));

data.markers.forEach(d => {
    const p = d.position;
    const selected = d.key.region_code === data.selected;
    const size = selected ? 40 : 32;
    const icon = L.divIcon({
        className: '',
        html: `<div style="width:${size}px;height:${size}px;border-radius:50%;background:${d.fill_color};border:${selected ? 3 : 2}px solid #fff;box-shadow:0 1px 4px rgba(0,0,0,.35);display:flex;align-items:center;justify-content:center;font-size:${size / 2}px">${d.icon}</div>`,
        iconSize: [size, size],
        iconAnchor: [size / 2, size / 2],
    });
    const m = L.marker([p.lat, p.lon], { icon }).addTo(map);
    const countdown = d.summary.countdown ? ` &middot; ${esc(d.summary.countdown)}` : '';
    m.bindTooltip(`<strong>${esc(d.summary.region_name)}</strong>${countdown}<br><span style="font-size:11px">${esc(d.summary.predicted_date)}</span>`);
    m.on('click', () => {
        window.location.href = `/map?species=${d.key.species}&view=map&selected=${encodeURIComponent(d.key.region_code)}`;
    });
    if (selected) {
        map.setView([p.lat, p.lon], 9);
    }
});
"#;

/// Everything the map page shows for one request.
#[derive(Clone, PartialEq)]
pub struct MapView {
    pub species: Species,
    pub view: ViewKind,
    pub tabs: Vec<SpeciesTab>,
    pub projection: Projection,
    pub selected: Option<String>,
    pub detail: Option<PredictionDetailView>,
}

pub fn map_href(species: &str, view: ViewKind, selected: Option<&str>) -> String {
    match selected {
        Some(code) => {
            let code: String = form_urlencoded::byte_serialize(code.as_bytes()).collect();
            format!("/map?species={species}&view={view}&selected={code}")
        }
        None => format!("/map?species={species}&view={view}"),
    }
}

#[allow(non_snake_case)]
#[component]
fn DetailPanel(detail: PredictionDetailView, close_href: String) -> Element {
    rsx! {
        aside { class: "fixed right-4 top-20 bottom-4 w-80 bg-white rounded-lg shadow-xl border border-gray-200 p-5 overflow-y-auto z-[1100]",
            div { class: "flex items-start justify-between",
                div {
                    div { class: "text-3xl", "{detail.species_icon}" }
                    h2 { class: "text-lg font-semibold mt-1", "{detail.region_name}" }
                    p { class: "text-sm text-gray-500", "{detail.species_name} ({detail.local_name})" }
                }
                a { href: "{close_href}", class: "text-gray-400 hover:text-gray-700 text-xl no-underline", title: "Close", "\u{00D7}" }
            }
            div { class: "mt-4 flex items-center gap-2",
                span {
                    class: "inline-block px-2 py-0.5 rounded-full text-xs font-semibold text-gray-900",
                    style: "background:{detail.color}",
                    "{detail.status_label}"
                }
                if let Some(countdown) = &detail.countdown {
                    span { class: "text-xl font-bold text-rose-600", "{countdown}" }
                }
            }
            dl { class: "mt-4 text-sm space-y-2",
                dt { class: "text-gray-500", "Predicted bloom" }
                dd { class: "font-medium", "{detail.predicted}" }
                dt { class: "text-gray-500", "Confidence window" }
                dd { "{detail.confidence_window}" }
                dt { class: "text-gray-500", "Best viewing" }
                dd { "{detail.best_viewing}" }
            }
            div { class: "mt-4 p-3 bg-rose-50 rounded text-sm text-gray-700 space-y-1",
                p { "Season: {detail.season}" }
                p { "Lasts {detail.duration}" }
                p { "Tip: {detail.feature}" }
            }
            p { class: "mt-4 text-xs text-gray-400",
                "Model {detail.model_version}, updated {detail.updated}"
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn MapPage(user: Option<UserView>, map: MapView) -> Element {
    let species = map.species.as_str();
    let close_href = map_href(species, map.view, None);
    let map_toggle = map_href(species, ViewKind::Map, map.selected.as_deref());
    let grid_toggle = map_href(species, ViewKind::Grid, map.selected.as_deref());
    let hidden = map.projection.hidden;

    let data_script = format!(
        "window.BLOOM_MAP = {};",
        script_json(&serde_json::json!({
            "species": species,
            "selected": map.selected,
            "markers": map.projection.descriptors,
        }))
    );

    rsx! {
        Layout { title: "Bloom Map".to_string(), active_page: "map".to_string(), user: user,
            div { class: "flex flex-wrap items-center gap-2 mb-4",
                for tab in map.tabs.iter() {
                    {
                        let href = map_href(tab.slug, map.view, None);
                        let class = if tab.active {
                            "px-3 py-2 rounded-lg border border-rose-400 bg-rose-500 text-white text-sm no-underline"
                        } else {
                            "px-3 py-2 rounded-lg border border-gray-200 bg-white text-gray-700 text-sm hover:border-rose-300 no-underline"
                        };
                        rsx! {
                            a { href: "{href}", class: class,
                                "{tab.icon} {tab.name} "
                                span { class: "opacity-75", "({tab.blooming}/{tab.total} in bloom)" }
                            }
                        }
                    }
                }
                div { class: "ml-auto flex gap-1 text-sm",
                    a { href: "{map_toggle}", class: "px-3 py-1.5 rounded border border-gray-200 bg-white no-underline text-gray-700", "Map" }
                    a { href: "{grid_toggle}", class: "px-3 py-1.5 rounded border border-gray-200 bg-white no-underline text-gray-700", "List" }
                }
            }
            div { class: "flex flex-wrap gap-3 mb-3 text-xs text-gray-600",
                for tier in LEGEND.iter() {
                    {
                        let color = tier.color();
                        let label = tier.label();
                        rsx! {
                            span { class: "flex items-center gap-1",
                                span { class: "inline-block w-3 h-3 rounded-full", style: "background:{color}" }
                                "{label}"
                            }
                        }
                    }
                }
            }
            if map.projection.descriptors.is_empty() {
                p { class: "text-gray-400 text-center py-10",
                    "No predictions available for this species yet."
                }
            } else if map.view == ViewKind::Map {
                div { id: "map", class: "h-[70vh] w-full rounded-lg border border-gray-200" }
                script { src: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" }
                script { dangerous_inner_html: data_script }
                script { dangerous_inner_html: MAP_SCRIPT }
            } else {
                div { class: "grid grid-cols-3 gap-3",
                    for d in map.projection.descriptors.iter() {
                        {
                            let (row, column) = match d.position {
                                Position::Cell { row, column } => (row + 1, column + 1),
                                Position::Geo { .. } => (1, 1),
                            };
                            let href = map_href(species, ViewKind::Grid, Some(&d.key.region_code));
                            let countdown = d.summary.countdown.clone().unwrap_or_default();
                            rsx! {
                                a {
                                    href: "{href}",
                                    class: "block bg-white rounded-lg border-l-4 border border-gray-200 p-4 hover:shadow no-underline text-gray-900",
                                    style: "grid-row:{row};grid-column:{column};border-left-color:{d.fill_color}",
                                    div { class: "flex justify-between items-center",
                                        span { class: "text-2xl", "{d.icon}" }
                                        span { class: "text-lg font-bold text-rose-600", "{countdown}" }
                                    }
                                    h3 { class: "font-semibold mt-1", "{d.summary.region_name}" }
                                    p { class: "text-sm text-gray-600", "{d.summary.predicted_date}" }
                                    p { class: "text-xs text-gray-400", "Window {d.summary.confidence_window}" }
                                    p { class: "text-xs mt-1", "{d.summary.status_label}" }
                                }
                            }
                        }
                    }
                }
                if hidden > 0 {
                    p { class: "text-sm text-gray-500 text-center mt-3", "{hidden} more regions" }
                }
            }
            if let Some(detail) = &map.detail {
                DetailPanel { detail: detail.clone(), close_href: close_href }
            }
        }
    }
}

pub fn render_map(user: Option<UserView>, map: MapView) -> String {
    let mut dom = VirtualDom::new_with_props(MapPage, MapPageProps { user, map });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
