use dioxus::prelude::*;

use bloommap_board::ProfileSummary;

use super::layout::Layout;
use super::{SightingView, UserView};
use crate::templates::render_to_html;

const ADMIN_SCRIPT: &str = r#"
const status = document.getElementById('admin-status');
const fail = async (res, fallback) => {
    const body = await res.json().catch(() => ({}));
    status.textContent = body.error || fallback;
};
document.querySelectorAll('button.role-toggle').forEach(button => {
    button.addEventListener('click', async () => {
        button.disabled = true;
        const res = await fetch('/api/admin/profiles/' + encodeURIComponent(button.value) + '/role', {
            method: 'POST',
            credentials: 'same-origin',
        });
        if (res.ok) {
            window.location.reload();
        } else {
            await fail(res, 'Role change failed');
            button.disabled = false;
        }
    });
});
document.querySelectorAll('button.sighting-delete').forEach(button => {
    button.addEventListener('click', async () => {
        if (!confirm('Delete this sighting?')) return;
        button.disabled = true;
        const res = await fetch('/api/sightings/' + encodeURIComponent(button.value), {
            method: 'DELETE',
            credentials: 'same-origin',
        });
        if (res.ok) {
            window.location.reload();
        } else {
            await fail(res, 'Delete failed');
            button.disabled = false;
        }
    });
});
"#;

/// Current admin filter values, echoed back into the form.
#[derive(Clone, PartialEq, Default)]
pub struct AdminFilterView {
    pub q: String,
    pub role: String,
    pub author: String,
}

#[derive(Clone, PartialEq)]
pub struct AuthorOption {
    pub user_id: String,
    pub nickname: String,
}

/// Everything the admin page shows, already filtered.
#[derive(Clone, PartialEq)]
pub struct AdminView {
    pub members: Vec<ProfileSummary>,
    pub member_total: usize,
    pub admin_total: usize,
    pub sightings: Vec<SightingView>,
    pub sighting_total: usize,
    pub authors: Vec<AuthorOption>,
    pub filter: AdminFilterView,
}

#[allow(non_snake_case)]
#[component]
fn AdminFilters(filter: AdminFilterView, authors: Vec<AuthorOption>) -> Element {
    let roles = [("all", "All roles"), ("admin", "Admins"), ("user", "Members")];
    rsx! {
        form { method: "get", action: "/admin", class: "flex flex-wrap gap-2 mb-6 text-sm",
            input { r#type: "search", name: "q", value: "{filter.q}",
                placeholder: "Search nickname or location",
                class: "flex-1 min-w-[12rem] border border-gray-300 rounded px-2 py-1.5" }
            select { name: "role", class: "border border-gray-300 rounded px-2 py-1.5",
                for (value, label) in roles.iter() {
                    {
                        let selected = filter.role == *value;
                        rsx! { option { value: *value, selected: selected, "{label}" } }
                    }
                }
            }
            select { name: "author", class: "border border-gray-300 rounded px-2 py-1.5",
                option { value: "all", "All authors" }
                for a in authors.iter() {
                    {
                        let selected = filter.author == a.user_id;
                        let value = a.user_id.clone();
                        rsx! { option { value: value, selected: selected, "{a.nickname}" } }
                    }
                }
            }
            button { r#type: "submit", class: "px-3 py-1.5 bg-gray-800 text-white rounded", "Filter" }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn MemberTable(members: Vec<ProfileSummary>) -> Element {
    rsx! {
        table { class: "w-full bg-white border border-gray-200 rounded-lg text-sm",
            thead {
                tr { class: "text-left text-gray-500 border-b",
                    th { class: "p-2", "Nickname" }
                    th { class: "p-2", "Role" }
                    th { class: "p-2 text-right", "Reports" }
                    th { class: "p-2 text-right", "Points" }
                    th { class: "p-2", "Joined" }
                    th { class: "p-2" }
                }
            }
            tbody {
                for p in members.iter() {
                    {
                        let joined = p.profile.created_at.format("%Y-%m-%d").to_string();
                        let privileged = p.profile.role.is_privileged();
                        let role = if privileged { "admin" } else { "user" };
                        let action = if privileged { "Revoke admin" } else { "Make admin" };
                        let user_id = p.profile.user_id.clone();
                        rsx! {
                            tr { class: "border-b last:border-0",
                                td { class: "p-2", "{p.profile.nickname}" }
                                td { class: "p-2", "{role}" }
                                td { class: "p-2 text-right", "{p.reports}" }
                                td { class: "p-2 text-right", "{p.points}" }
                                td { class: "p-2 text-gray-500", "{joined}" }
                                td { class: "p-2 text-right",
                                    button { r#type: "button", class: "role-toggle px-2 py-1 border border-gray-300 rounded hover:bg-gray-50",
                                        value: "{user_id}",
                                        "{action}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn SightingQueue(sightings: Vec<SightingView>, total: usize) -> Element {
    let shown = sightings.len();
    rsx! {
        p { class: "text-sm text-gray-500 mb-2", "Showing {shown} of {total} sightings" }
        if sightings.is_empty() {
            p { class: "text-gray-500", "No sightings match." }
        }
        ul { class: "space-y-2",
            for s in sightings.iter() {
                {
                    let href = format!("/board/{}", s.id);
                    let id = s.id.clone();
                    rsx! {
                        li { class: "sighting-row bg-white border border-gray-200 rounded-lg p-3 flex items-center gap-3 text-sm",
                            span { class: "text-xl", "{s.species_icon}" }
                            div { class: "flex-1",
                                a { href: "{href}", class: "font-medium text-gray-900", "{s.region_name}" }
                                span { class: "text-gray-500", " \u{00B7} {s.species_name} \u{00B7} {s.stage_label}" }
                                p { class: "text-gray-500",
                                    "by {s.nickname}"
                                    if s.author_privileged {
                                        span { class: "ml-1 px-1.5 rounded bg-amber-100 text-amber-800 text-xs", "admin" }
                                    }
                                    " \u{00B7} {s.created}"
                                }
                            }
                            if s.can_delete {
                                button { r#type: "button",
                                    class: "sighting-delete px-2 py-1 border border-red-300 text-red-700 rounded hover:bg-red-50",
                                    value: "{id}",
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn AdminPage(#[props(!optional)] user: Option<UserView>, admin: AdminView) -> Element {
    let member_total = admin.member_total;
    let admin_total = admin.admin_total;
    rsx! {
        Layout { title: "Admin".to_string(), active_page: "admin".to_string(), user: user,
            AdminFilters { filter: admin.filter.clone(), authors: admin.authors.clone() }
            p { id: "admin-status", class: "text-sm text-rose-700 mb-2" }
            h2 { class: "text-xl font-semibold", "Members" }
            p { class: "text-sm text-gray-500 mb-4", "{member_total} members, {admin_total} admins" }
            MemberTable { members: admin.members.clone() }
            h2 { class: "text-xl font-semibold mt-8", "Sightings" }
            SightingQueue { sightings: admin.sightings.clone(), total: admin.sighting_total }
            script { dangerous_inner_html: ADMIN_SCRIPT }
        }
    }
}

pub fn render_admin(user: Option<UserView>, admin: AdminView) -> String {
    let mut dom = VirtualDom::new_with_props(AdminPage, AdminPageProps { user, admin });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
