use dioxus::prelude::*;

use bloommap_board::{Badge, Contributor, POINTS_PER_REPORT};

use super::layout::Layout;
use super::UserView;
use crate::templates::render_to_html;

const MEDALS: [&str; 3] = ["\u{1F947}", "\u{1F948}", "\u{1F949}"];
const BADGES: [Badge; 4] = [Badge::Expert, Badge::Explorer, Badge::Sprout, Badge::Novice];

#[allow(non_snake_case)]
#[component]
fn HallOfFame(#[props(!optional)] user: Option<UserView>, contributors: Vec<Contributor>) -> Element {
    let podium: Vec<Contributor> = contributors.iter().take(3).cloned().collect();
    rsx! {
        Layout { title: "Hall of Fame".to_string(), active_page: "hall-of-fame".to_string(), user: user,
            h2 { class: "text-xl font-semibold", "Hall of Fame" }
            p { class: "text-sm text-gray-500 mb-6",
                "Every sighting report earns {POINTS_PER_REPORT} points."
            }
            if contributors.is_empty() {
                p { class: "text-gray-400 text-center py-10", "No reports yet. Be the first to share a bloom!" }
            } else {
                div { class: "grid grid-cols-3 gap-4 mb-8",
                    for (i, c) in podium.iter().enumerate() {
                        {
                            let medal = MEDALS[i];
                            let badge = c.badge.emoji();
                            rsx! {
                                div { class: "bg-white border border-amber-200 rounded-lg p-4 text-center",
                                    div { class: "text-4xl", "{medal}" }
                                    p { class: "font-semibold mt-2", "{c.nickname}" }
                                    p { class: "text-sm text-gray-500", "{badge} {c.points} pts \u{00B7} {c.reports} reports" }
                                }
                            }
                        }
                    }
                }
                table { class: "w-full bg-white border border-gray-200 rounded-lg text-sm",
                    thead {
                        tr { class: "text-left text-gray-500 border-b",
                            th { class: "p-2", "Rank" }
                            th { class: "p-2", "Nickname" }
                            th { class: "p-2", "Badge" }
                            th { class: "p-2 text-right", "Reports" }
                            th { class: "p-2 text-right", "Points" }
                            th { class: "p-2", "Last report" }
                        }
                    }
                    tbody {
                        for c in contributors.iter() {
                            {
                                let badge = format!("{} {}", c.badge.emoji(), c.badge.title());
                                let last = c.last_report.format("%b %-d, %Y").to_string();
                                rsx! {
                                    tr { class: "border-b last:border-0",
                                        td { class: "p-2 font-semibold", "{c.rank}" }
                                        td { class: "p-2", "{c.nickname}" }
                                        td { class: "p-2", "{badge}" }
                                        td { class: "p-2 text-right", "{c.reports}" }
                                        td { class: "p-2 text-right", "{c.points}" }
                                        td { class: "p-2 text-gray-500", "{last}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div { class: "mt-8 text-xs text-gray-500 flex flex-wrap gap-4",
                for b in BADGES.iter() {
                    {
                        let label = format!("{} {} ({}+ pts)", b.emoji(), b.title(), b.min_points());
                        rsx! { span { "{label}" } }
                    }
                }
            }
        }
    }
}

pub fn render_hall_of_fame(user: Option<UserView>, contributors: Vec<Contributor>) -> String {
    let mut dom = VirtualDom::new_with_props(HallOfFame, HallOfFameProps { user, contributors });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
