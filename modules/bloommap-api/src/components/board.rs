use dioxus::prelude::*;

use bloommap_common::{GrowthStage, Species};

use super::layout::Layout;
use super::{SightingView, UserView};
use crate::templates::render_to_html;

const REPORT_SCRIPT: &str = r#"
const form = document.getElementById('report-form');
const locate = document.getElementById('locate');
if (locate && navigator.geolocation) {
    locate.addEventListener('click', () => {
        navigator.geolocation.getCurrentPosition(pos => {
            form.lat.value = pos.coords.latitude.toFixed(5);
            form.lon.value = pos.coords.longitude.toFixed(5);
            locate.textContent = 'Location attached';
        });
    });
}
if (form) {
    form.addEventListener('submit', async e => {
        e.preventDefault();
        const status = document.getElementById('report-status');
        const button = form.querySelector('button[type=submit]');
        button.disabled = true;
        status.textContent = 'Submitting...';
        try {
            const res = await fetch('/api/sightings', { method: 'POST', body: new FormData(form), credentials: 'same-origin' });
            const body = await res.json().catch(() => ({}));
            if (res.ok) {
                window.location.href = '/board/' + encodeURIComponent(body.id);
                return;
            }
            status.textContent = body.issues ? body.issues.map(i => i.message).join(' / ') : (body.error || 'Submission failed');
        } catch (err) {
            status.textContent = 'Network error, please try again';
        }
        button.disabled = false;
    });
}
"#;

/// Current board filter values, echoed back into the form.
#[derive(Clone, PartialEq, Default)]
pub struct BoardFilterView {
    pub q: String,
    pub species: String,
    pub stage: String,
}

#[allow(non_snake_case)]
#[component]
fn ReportForm(today: String) -> Element {
    rsx! {
        form { id: "report-form", class: "bg-white border border-gray-200 rounded-lg p-4 mb-6 grid grid-cols-2 gap-3 text-sm",
            h3 { class: "col-span-2 font-semibold text-base", "Report a sighting" }
            label { class: "col-span-2",
                "Location"
                input { r#type: "text", name: "region_name", required: true, maxlength: "120",
                    placeholder: "e.g. Yeouido Park, Seoul",
                    class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5" }
            }
            label {
                "Flower"
                select { name: "species", class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5",
                    for species in Species::ALL.iter() {
                        {
                            let info = species.info();
                            let value = species.as_str();
                            rsx! { option { value: value, "{info.icon} {info.name}" } }
                        }
                    }
                }
            }
            label {
                "Stage"
                select { name: "stage", class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5",
                    option { value: "bloom", "{GrowthStage::Bloom.label()}" }
                    option { value: "bud", "{GrowthStage::Bud.label()}" }
                }
            }
            label {
                "Observed on"
                input { r#type: "date", name: "date", required: true, max: "{today}", value: "{today}",
                    class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5" }
            }
            label {
                "Photo (JPEG, PNG or WebP)"
                input { r#type: "file", name: "photo", accept: "image/jpeg,image/png,image/webp",
                    class: "mt-1 w-full" }
            }
            label { class: "col-span-2",
                "Note"
                textarea { name: "note", maxlength: "500", rows: "3",
                    class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5" }
            }
            input { r#type: "hidden", name: "lat" }
            input { r#type: "hidden", name: "lon" }
            div { class: "col-span-2 flex items-center gap-3",
                button { r#type: "submit", class: "px-4 py-1.5 bg-rose-500 text-white rounded font-medium hover:bg-rose-600", "Submit" }
                button { r#type: "button", id: "locate", class: "px-3 py-1.5 border border-gray-300 rounded", "Use my location" }
                span { id: "report-status", class: "text-rose-700" }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn BoardPage(
    #[props(!optional)] user: Option<UserView>,
    sightings: Vec<SightingView>,
    filter: BoardFilterView,
    today: String,
) -> Element {
    let signed_in = user.is_some();
    let count = sightings.len();
    rsx! {
        Layout { title: "Sightings".to_string(), active_page: "board".to_string(), user: user,
            h2 { class: "text-xl font-semibold mb-4", "Community sightings" }
            if signed_in {
                ReportForm { today: today }
            } else {
                p { class: "text-sm text-gray-500 mb-4", "Sign in to report what you see." }
            }
            form { method: "get", action: "/board", class: "flex flex-wrap gap-2 mb-4 text-sm",
                input { r#type: "search", name: "q", value: "{filter.q}", placeholder: "Search location or nickname",
                    class: "border border-gray-300 rounded px-2 py-1.5 flex-1 min-w-[12rem]" }
                select { name: "species", class: "border border-gray-300 rounded px-2 py-1.5",
                    option { value: "all", selected: filter.species == "all" || filter.species.is_empty(), "All flowers" }
                    for species in Species::ALL.iter() {
                        {
                            let value = species.as_str();
                            let name = species.info().name;
                            let selected = filter.species == value;
                            rsx! { option { value: value, selected: selected, "{name}" } }
                        }
                    }
                }
                select { name: "stage", class: "border border-gray-300 rounded px-2 py-1.5",
                    option { value: "all", selected: filter.stage == "all" || filter.stage.is_empty(), "All stages" }
                    option { value: "bloom", selected: filter.stage == "bloom", "{GrowthStage::Bloom.label()}" }
                    option { value: "bud", selected: filter.stage == "bud", "{GrowthStage::Bud.label()}" }
                }
                button { r#type: "submit", class: "px-3 py-1.5 bg-gray-800 text-white rounded", "Filter" }
            }
            p { class: "text-xs text-gray-400 mb-2", "{count} sightings" }
            if sightings.is_empty() {
                p { class: "text-gray-400 text-center py-10", "No sightings match these filters." }
            }
            div { class: "grid grid-cols-1 md:grid-cols-2 gap-3",
                for s in sightings.iter() {
                    a { href: "/board/{s.id}", class: "flex gap-3 bg-white border border-gray-200 rounded-lg p-3 hover:border-rose-300 no-underline text-gray-900",
                        if let Some(url) = &s.photo_url {
                            img { src: "{url}", alt: "{s.region_name}", class: "w-20 h-20 object-cover rounded" }
                        } else {
                            div { class: "w-20 h-20 rounded bg-rose-50 flex items-center justify-center text-3xl", "{s.species_icon}" }
                        }
                        div { class: "min-w-0",
                            h3 { class: "font-semibold truncate", "{s.region_name}" }
                            p { class: "text-xs text-gray-500", "{s.species_name} \u{00B7} {s.stage_label} \u{00B7} {s.date}" }
                            p { class: "text-xs text-gray-400 mt-1",
                                "by {s.nickname}"
                                if s.author_privileged {
                                    span { class: "ml-1 px-1.5 rounded bg-amber-100 text-amber-800", "admin" }
                                }
                            }
                            if let Some(note) = &s.note {
                                p { class: "text-sm text-gray-600 mt-1 truncate", "{note}" }
                            }
                        }
                    }
                }
            }
            script { dangerous_inner_html: REPORT_SCRIPT }
        }
    }
}

pub fn render_board(
    user: Option<UserView>,
    sightings: Vec<SightingView>,
    filter: BoardFilterView,
    today: String,
) -> String {
    let mut dom = VirtualDom::new_with_props(
        BoardPage,
        BoardPageProps {
            user,
            sightings,
            filter,
            today,
        },
    );
    dom.rebuild_in_place();
    render_to_html(&dom)
}
