use dioxus::prelude::*;

use super::UserView;

struct NavItem {
    key: &'static str,
    label: &'static str,
    href: &'static str,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { key: "map", label: "Bloom Map", href: "/map" },
    NavItem { key: "board", label: "Sightings", href: "/board" },
    NavItem { key: "hall-of-fame", label: "Hall of Fame", href: "/hall-of-fame" },
];

/// Site layout with top navigation.
#[allow(non_snake_case)]
#[component]
pub fn Layout(
    title: String,
    active_page: String,
    #[props(!optional)] user: Option<UserView>,
    children: Element,
) -> Element {
    let full_title = format!("{title} | BloomMap");
    let show_admin = user.as_ref().is_some_and(|u| u.is_privileged);
    let admin_class = if active_page == "admin" {
        "px-3 py-1.5 rounded text-sm text-white bg-rose-500"
    } else {
        "px-3 py-1.5 rounded text-sm text-gray-600 hover:text-rose-600 hover:bg-rose-50 transition-colors"
    };
    let profile_class = if active_page == "profile" {
        "font-semibold text-rose-600"
    } else {
        "font-semibold text-gray-900 hover:text-rose-600"
    };
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{full_title}" }
            script { src: "https://cdn.tailwindcss.com" }
            link { rel: "stylesheet", href: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" }
        }
        body { class: "min-h-screen bg-rose-50/40 font-sans text-gray-900",
            header { class: "bg-white border-b border-rose-100 sticky top-0 z-[1000]",
                div { class: "max-w-6xl mx-auto px-4 h-14 flex items-center gap-6",
                    a { href: "/map", class: "text-lg font-semibold text-rose-600 no-underline",
                        "\u{1F338} BloomMap"
                    }
                    nav { class: "flex gap-1",
                        for item in NAV_ITEMS.iter() {
                            {
                                let class = if item.key == active_page {
                                    "px-3 py-1.5 rounded text-sm text-white bg-rose-500"
                                } else {
                                    "px-3 py-1.5 rounded text-sm text-gray-600 hover:text-rose-600 hover:bg-rose-50 transition-colors"
                                };
                                let href = item.href;
                                let label = item.label;
                                rsx! { a { href: href, class: class, "{label}" } }
                            }
                        }
                        if show_admin {
                            a { href: "/admin", class: admin_class, "Admin" }
                        }
                    }
                    div { class: "ml-auto text-sm text-gray-500",
                        if let Some(u) = &user {
                            span { "Signed in as "
                                a { href: "/profile", class: profile_class, "{u.display_name}" }
                            }
                        } else {
                            span { "Browsing as guest" }
                        }
                    }
                }
            }
            main { class: "max-w-6xl mx-auto px-4 py-6",
                {children}
            }
        }
    }
}
