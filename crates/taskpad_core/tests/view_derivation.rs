use taskpad_core::{derive_view, SortMode, Task};

#[test]
fn empty_keyword_keeps_everything_in_insertion_order() {
    let tasks = [task(1, "Buy milk"), task(2, "Clean house")];

    let visible = derive_view(&tasks, "", SortMode::Default);

    assert_eq!(titles(&visible), ["Buy milk", "Clean house"]);
}

#[test]
fn keyword_filter_is_a_case_insensitive_substring_match() {
    let tasks = [task(1, "Buy milk"), task(2, "Clean house")];

    assert_eq!(titles(&derive_view(&tasks, "mil", SortMode::Default)), ["Buy milk"]);
    assert_eq!(titles(&derive_view(&tasks, "MILK", SortMode::Default)), ["Buy milk"]);
    assert_eq!(titles(&derive_view(&tasks, "ou", SortMode::Default)), ["Clean house"]);
    assert!(derive_view(&tasks, "xyz", SortMode::Default).is_empty());
}

#[test]
fn alphabetical_sort_ignores_case() {
    let tasks = [task(1, "Banana"), task(2, "apple"), task(3, "Cherry")];

    let visible = derive_view(&tasks, "", SortMode::Alphabetical);

    assert_eq!(titles(&visible), ["apple", "Banana", "Cherry"]);
}

#[test]
fn alphabetical_sort_keeps_insertion_order_for_equal_titles() {
    let tasks = [task(1, "apple"), task(2, "APPLE"), task(3, "Apple")];

    let visible = derive_view(&tasks, "", SortMode::Alphabetical);

    let ids: Vec<u64> = visible.iter().map(|t| t.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[test]
fn date_sort_orders_ascending_with_unset_timestamps_first() {
    let tasks = [
        task_at(1, "newest", Some(3_000)),
        task_at(2, "undated", None),
        task_at(3, "oldest", Some(1_000)),
    ];

    let visible = derive_view(&tasks, "", SortMode::Date);

    assert_eq!(titles(&visible), ["undated", "oldest", "newest"]);
}

#[test]
fn sort_applies_before_the_keyword_filter() {
    let tasks = [task(1, "Pancake"), task(2, "banana"), task(3, "Mango")];

    let visible = derive_view(&tasks, "an", SortMode::Alphabetical);

    assert_eq!(titles(&visible), ["banana", "Mango", "Pancake"]);
}

#[test]
fn filter_and_sort_leave_the_input_untouched() {
    let tasks = [task(1, "zeta"), task(2, "alpha")];

    let _ = derive_view(&tasks, "alp", SortMode::Alphabetical);

    assert_eq!(tasks[0].title, "zeta");
    assert_eq!(tasks[1].title, "alpha");
}

fn task(id: u64, title: &str) -> Task {
    task_at(id, title, Some(id as i64))
}

fn task_at(id: u64, title: &str, created_at: Option<i64>) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed: false,
        created_at,
    }
}

fn titles<'t>(visible: &[&'t Task]) -> Vec<&'t str> {
    visible.iter().map(|t| t.title.as_str()).collect()
}
