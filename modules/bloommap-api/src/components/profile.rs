use dioxus::prelude::*;

use bloommap_board::{Badge, ProfileSummary};

use super::layout::Layout;
use super::UserView;
use crate::jwt::COOKIE_NAME;
use crate::templates::{render_to_html, script_json};

const PROFILE_SCRIPT: &str = r#"
const form = document.getElementById('nickname-form');
const status = document.getElementById('profile-status');
form.addEventListener('submit', async e => {
    e.preventDefault();
    const button = form.querySelector('button[type=submit]');
    button.disabled = true;
    const res = await fetch('/api/profile', {
        method: 'PATCH',
        headers: { 'Content-Type': 'application/json' },
        credentials: 'same-origin',
        body: JSON.stringify({ nickname: form.nickname.value }),
    });
    if (res.ok) {
        window.location.reload();
        return;
    }
    const body = await res.json().catch(() => ({}));
    status.textContent = body.issues ? body.issues.map(i => i.message).join(' / ') : (body.error || 'Nickname change failed');
    button.disabled = false;
});
document.getElementById('sign-out').addEventListener('click', () => {
    document.cookie = window.BLOOM_COOKIE + '=; Max-Age=0; path=/';
    window.location.href = '/map';
});
"#;

#[allow(non_snake_case)]
#[component]
fn ProfilePage(#[props(!optional)] user: Option<UserView>, summary: ProfileSummary) -> Element {
    let badge = Badge::for_points(summary.points);
    let badge_emoji = badge.emoji();
    let badge_title = badge.title();
    let joined = summary.profile.created_at.format("%Y-%m-%d").to_string();
    let cookie_script = format!("window.BLOOM_COOKIE = {};", script_json(&COOKIE_NAME));
    rsx! {
        Layout { title: "My profile".to_string(), active_page: "profile".to_string(), user: user,
            div { class: "bg-white border border-gray-200 rounded-lg p-6 max-w-xl",
                h2 { class: "text-xl font-semibold mb-4", "My profile" }
                dl { class: "grid grid-cols-[8rem_1fr] gap-y-1 text-sm mb-6",
                    dt { class: "text-gray-500", "Badge" }
                    dd { "{badge_emoji} {badge_title}" }
                    dt { class: "text-gray-500", "Reports" }
                    dd { "{summary.reports}" }
                    dt { class: "text-gray-500", "Points" }
                    dd { "{summary.points}" }
                    dt { class: "text-gray-500", "Joined" }
                    dd { "{joined}" }
                }
                form { id: "nickname-form", class: "text-sm",
                    label { "Nickname"
                        input { r#type: "text", name: "nickname", required: true, maxlength: "20",
                            value: "{summary.profile.nickname}",
                            class: "mt-1 w-full border border-gray-300 rounded px-2 py-1.5" }
                    }
                    button { r#type: "submit", class: "mt-3 w-full px-3 py-1.5 bg-gray-800 text-white rounded", "Save nickname" }
                }
                p { id: "profile-status", class: "mt-2 text-sm text-rose-700" }
                button { id: "sign-out", r#type: "button",
                    class: "mt-4 w-full px-3 py-1.5 border border-gray-300 rounded text-sm hover:bg-gray-50",
                    "Sign out"
                }
            }
            script { dangerous_inner_html: cookie_script }
            script { dangerous_inner_html: PROFILE_SCRIPT }
        }
    }
}

pub fn render_profile(user: Option<UserView>, summary: ProfileSummary) -> String {
    let mut dom = VirtualDom::new_with_props(ProfilePage, ProfilePageProps { user, summary });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
