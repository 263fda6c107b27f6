//! Grouping of per-person preorder entries into renderable shapes.
//!
//! Table-menu mode partitions selections into course lists with sides
//! attached to the same person's main. Buffet mode aggregates quantities by
//! resolved item name instead.

use crate::app::ports::MenuItemLookup;
use crate::pipeline::item_name::resolve_name;
use crate::types::{BuffetLine, CourseGroups, CourseRow, CourseType, GroupedPreorder, PreorderPerson};
use tracing::instrument;

/// Groups a preorder for rendering. One name lookup per selection lacking an
/// inline name; lookups are independent and a miss never aborts grouping.
#[instrument(skip(people, lookup), fields(people = people.len(), buffet = is_buffet))]
pub async fn group(
    people: &[PreorderPerson],
    is_buffet: bool,
    lookup: &dyn MenuItemLookup,
) -> GroupedPreorder {
    if is_buffet {
        GroupedPreorder::Buffet(group_buffet(people, lookup).await)
    } else {
        GroupedPreorder::Courses(group_courses(people, lookup).await)
    }
}

async fn group_buffet(people: &[PreorderPerson], lookup: &dyn MenuItemLookup) -> Vec<BuffetLine> {
    let mut lines: Vec<BuffetLine> = Vec::new();
    for person in people {
        for selection in &person.selections {
            let item = resolve_name(selection, lookup).await;
            if item.is_empty() {
                continue;
            }
            match lines.iter_mut().find(|line| line.item == item) {
                Some(line) => line.quantity += selection.quantity,
                None => lines.push(BuffetLine {
                    item,
                    quantity: selection.quantity,
                }),
            }
        }
    }
    lines
}

async fn group_courses(people: &[PreorderPerson], lookup: &dyn MenuItemLookup) -> CourseGroups {
    let mut groups = CourseGroups::default();

    for person in people {
        // At most one selection per course type per person; first one wins.
        let mut starter = String::new();
        let mut main = String::new();
        let mut side = String::new();
        let mut dessert = String::new();

        for selection in &person.selections {
            let Some(course) = selection.course else { continue };
            let slot = match course {
                CourseType::Starter => &mut starter,
                CourseType::Main => &mut main,
                CourseType::Side => &mut side,
                CourseType::Dessert => &mut dessert,
            };
            if slot.is_empty() {
                *slot = resolve_name(selection, lookup).await;
            }
        }

        let label = person.label();
        let notes = person.special_instructions.trim().to_string();

        if !starter.is_empty() {
            groups.starters.push(CourseRow {
                person: label.clone(),
                item: starter,
                side: String::new(),
                notes: notes.clone(),
            });
        }
        if !main.is_empty() {
            // The side rides on the main row and is never a standalone row.
            groups.mains.push(CourseRow {
                person: label.clone(),
                item: main,
                side,
                notes: notes.clone(),
            });
        }
        if !dessert.is_empty() {
            groups.desserts.push(CourseRow {
                person: label,
                item: dessert,
                side: String::new(),
                notes,
            });
        }
    }

    // Identical orders cluster together for kitchen readability; per-person
    // ordering within a course is intentionally lost here.
    groups.starters.sort_by(|a, b| a.item.cmp(&b.item));
    groups.mains.sort_by(|a, b| a.item.cmp(&b.item));
    groups.desserts.sort_by(|a, b| a.item.cmp(&b.item));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::MenuItemRef;
    use crate::types::Selection;
    use async_trait::async_trait;

    struct NoLookup;

    #[async_trait]
    impl MenuItemLookup for NoLookup {
        async fn find_item(&self, _id: &str) -> Option<MenuItemRef> {
            None
        }
    }

    fn person(number: u32, notes: &str, selections: Vec<Selection>) -> PreorderPerson {
        PreorderPerson {
            person_number: number,
            person_name: None,
            special_instructions: notes.to_string(),
            selections,
        }
    }

    fn pick(course: Option<CourseType>, name: &str, quantity: u32) -> Selection {
        Selection {
            course,
            quantity,
            item_name: Some(name.to_string()),
            menu_item_id: None,
        }
    }

    #[tokio::test]
    async fn buffet_sums_quantities_in_first_seen_order() {
        let people = vec![
            person(1, "", vec![pick(None, "Chicken Wings", 1), pick(None, "Halloumi Fries", 2)]),
            person(2, "", vec![pick(None, "Chicken Wings", 2)]),
        ];
        let GroupedPreorder::Buffet(lines) = group(&people, true, &NoLookup).await else {
            panic!("expected buffet grouping");
        };
        assert_eq!(
            lines,
            vec![
                BuffetLine { item: "Chicken Wings".into(), quantity: 3 },
                BuffetLine { item: "Halloumi Fries".into(), quantity: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn sides_attach_to_the_same_persons_main() {
        let people = vec![
            person(1, "", vec![
                pick(Some(CourseType::Main), "Steak", 1),
                pick(Some(CourseType::Side), "Chips", 1),
            ]),
            person(2, "", vec![pick(Some(CourseType::Main), "Salmon", 1)]),
        ];
        let GroupedPreorder::Courses(groups) = group(&people, false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert!(groups.starters.is_empty());
        assert!(groups.desserts.is_empty());
        assert_eq!(groups.mains.len(), 2);
        // Sorted by item name: Salmon before Steak.
        assert_eq!(groups.mains[0].item, "Salmon");
        assert_eq!(groups.mains[0].side, "");
        assert_eq!(groups.mains[1].item, "Steak");
        assert_eq!(groups.mains[1].side, "Chips");
    }

    #[tokio::test]
    async fn side_alone_emits_no_row() {
        let people = vec![person(1, "", vec![pick(Some(CourseType::Side), "Chips", 1)])];
        let GroupedPreorder::Courses(groups) = group(&people, false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert!(groups.starters.is_empty());
        assert!(groups.mains.is_empty());
        assert!(groups.desserts.is_empty());
    }

    #[tokio::test]
    async fn no_dessert_row_for_a_person_without_dessert() {
        let people = vec![
            person(1, "", vec![
                pick(Some(CourseType::Main), "Steak", 1),
                pick(Some(CourseType::Dessert), "Tiramisu", 1),
            ]),
            person(2, "", vec![pick(Some(CourseType::Main), "Salmon", 1)]),
        ];
        let GroupedPreorder::Courses(groups) = group(&people, false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert_eq!(groups.desserts.len(), 1);
        assert_eq!(groups.desserts[0].person, "Guest 1");
    }

    #[tokio::test]
    async fn empty_person_contributes_nothing() {
        let people = vec![person(1, "", vec![])];
        let GroupedPreorder::Courses(groups) = group(&people, false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert!(groups.starters.is_empty() && groups.mains.is_empty() && groups.desserts.is_empty());
    }

    #[tokio::test]
    async fn first_selection_per_course_wins() {
        let people = vec![person(1, "", vec![
            pick(Some(CourseType::Main), "Steak", 1),
            pick(Some(CourseType::Main), "Salmon", 1),
        ])];
        let GroupedPreorder::Courses(groups) = group(&people, false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert_eq!(groups.mains.len(), 1);
        assert_eq!(groups.mains[0].item, "Steak");
    }

    #[tokio::test]
    async fn person_names_label_rows() {
        let mut entry = person(2, "no nuts", vec![pick(Some(CourseType::Starter), "Soup", 1)]);
        entry.person_name = Some("Alex".to_string());
        let GroupedPreorder::Courses(groups) = group(&[entry], false, &NoLookup).await else {
            panic!("expected course grouping");
        };
        assert_eq!(groups.starters[0].person, "Alex");
        assert_eq!(groups.starters[0].notes, "no nuts");
    }
}
