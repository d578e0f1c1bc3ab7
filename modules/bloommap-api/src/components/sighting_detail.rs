use dioxus::prelude::*;

use super::layout::Layout;
use super::{SightingView, UserView};
use crate::templates::{render_to_html, script_json};

const ACTIONS_SCRIPT: &str = r#"
const id = window.BLOOM_SIGHTING;
const status = document.getElementById('action-status');
const fail = async res => {
    const body = await res.json().catch(() => ({}));
    status.textContent = body.issues ? body.issues.map(i => i.message).join(' / ') : (body.error || 'Request failed');
};
const noteForm = document.getElementById('note-form');
if (noteForm) {
    noteForm.addEventListener('submit', async e => {
        e.preventDefault();
        const res = await fetch('/api/sightings/' + encodeURIComponent(id), {
            method: 'PATCH',
            headers: { 'Content-Type': 'application/json' },
            credentials: 'same-origin',
            body: JSON.stringify({ note: noteForm.note.value }),
        });
        if (res.ok) { window.location.reload(); } else { await fail(res); }
    });
}
const del = document.getElementById('delete-sighting');
if (del) {
    del.addEventListener('click', async () => {
        if (!confirm('Delete this sighting?')) return;
        const res = await fetch('/api/sightings/' + encodeURIComponent(id), { method: 'DELETE', credentials: 'same-origin' });
        if (res.ok) { window.location.href = '/board'; } else { await fail(res); }
    });
}
"#;

#[allow(non_snake_case)]
#[component]
fn SightingDetail(#[props(!optional)] user: Option<UserView>, sighting: SightingView) -> Element {
    let s = sighting;
    let id_script = format!("window.BLOOM_SIGHTING = {};", script_json(&s.id));
    let note_text = s.note.clone().unwrap_or_default();
    let coordinates = format!("{:.4}, {:.4}", s.lat, s.lon);
    rsx! {
        Layout { title: s.region_name.clone(), active_page: "board".to_string(), user: user,
            a { href: "/board", class: "text-sm text-rose-600 no-underline", "\u{2190} Back to sightings" }
            div { class: "bg-white border border-gray-200 rounded-lg p-6 mt-3 max-w-2xl",
                if let Some(url) = &s.photo_url {
                    img { src: "{url}", alt: "{s.region_name}", class: "w-full max-h-[28rem] object-cover rounded mb-4" }
                }
                div { class: "flex items-center gap-2",
                    span { class: "text-3xl", "{s.species_icon}" }
                    div {
                        h2 { class: "text-xl font-semibold", "{s.region_name}" }
                        p { class: "text-sm text-gray-500", "{s.species_name} \u{00B7} {s.stage_label}" }
                    }
                }
                dl { class: "mt-4 grid grid-cols-[8rem_1fr] gap-y-1 text-sm",
                    dt { class: "text-gray-500", "Observed" }
                    dd { "{s.date}" }
                    dt { class: "text-gray-500", "Reported by" }
                    dd {
                        "{s.nickname}"
                        if s.author_privileged {
                            span { class: "ml-1 px-1.5 rounded bg-amber-100 text-amber-800 text-xs", "admin" }
                        }
                    }
                    dt { class: "text-gray-500", "Posted" }
                    dd { "{s.created}" }
                    dt { class: "text-gray-500", "Coordinates" }
                    dd { "{coordinates}" }
                }
                if let Some(note) = &s.note {
                    p { class: "mt-4 whitespace-pre-line text-gray-700", "{note}" }
                }
                if s.can_edit {
                    form { id: "note-form", class: "mt-6 text-sm",
                        label { "Edit note"
                            textarea { name: "note", maxlength: "500", rows: "3",
                                class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5",
                                "{note_text}"
                            }
                        }
                        button { r#type: "submit", class: "mt-2 px-3 py-1.5 bg-gray-800 text-white rounded", "Save note" }
                    }
                }
                if s.can_delete {
                    button { id: "delete-sighting", r#type: "button",
                        class: "mt-4 px-3 py-1.5 border border-red-300 text-red-700 rounded text-sm hover:bg-red-50",
                        "Delete sighting"
                    }
                }
                p { id: "action-status", class: "mt-2 text-sm text-rose-700" }
            }
            if s.can_edit || s.can_delete {
                script { dangerous_inner_html: id_script }
                script { dangerous_inner_html: ACTIONS_SCRIPT }
            }
        }
    }
}

pub fn render_sighting_detail(user: Option<UserView>, sighting: SightingView) -> String {
    let mut dom =
        VirtualDom::new_with_props(SightingDetail, SightingDetailProps { user, sighting });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
