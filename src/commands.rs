use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::api::Backend;
use crate::filter::{self, FilterState};
use crate::modal::{CategoryForm, TaskForm};
use crate::models::{Category, Priority};
use crate::store::DataStore;
use crate::view::{self, Card, CalendarCursor, ListRow, MonthGrid, Rendered, ViewMode, WEEKDAYS};

/// What `list` should show.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub view: ViewMode,
    pub cursor: CalendarCursor,
    pub search: String,
    pub category: Option<String>,
    pub filter: FilterState,
}

/// Optional task fields given on the command line. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TaskFields {
    pub title: Option<String>,
    pub project: Option<String>,
    pub priority: Option<Priority>,
    pub owner: Option<String>,
    /// Category id, or "none" to detach.
    pub category: Option<String>,
    /// `YYYY-MM-DD`, or empty to clear.
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TaskFields {
    fn apply(&self, form: &mut TaskForm) {
        if let Some(v) = &self.title { form.title = v.clone(); }
        if let Some(v) = &self.project { form.project = v.clone(); }
        if let Some(v) = self.priority { form.priority = v; }
        if let Some(v) = &self.owner { form.owner = v.clone(); }
        if let Some(v) = &self.category {
            form.category = (!v.eq_ignore_ascii_case("none") && !v.is_empty()).then(|| v.clone());
        }
        if let Some(v) = &self.date { form.date = v.clone(); }
        if let Some(v) = &self.description { form.description = v.clone(); }
    }
}

fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn hex_color(hex: &str) -> Color {
    match view::hex_rgb(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

fn ensure_category(categories: &[Category], id: Option<&str>) -> Result<()> {
    match id {
        Some(id) if !categories.iter().any(|c| c.id == id) => bail!("Category {} not found.", id),
        _ => Ok(()),
    }
}

/// Asks a yes/no question on stdin. Anything but "y" is no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn list_table(rows: &[ListRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["ID", "Task", "Project", "Priority", "Date", "Owner", "Category"]
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    for r in rows {
        let category = match &r.category {
            Some(badge) => Cell::new(&badge.name).fg(hex_color(&badge.color)),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(&r.task_id),
            Cell::new(&r.title),
            Cell::new(&r.project),
            Cell::new(r.priority).fg(priority_color(r.priority)),
            Cell::new(&r.date),
            Cell::new(&r.owner),
            category,
        ]);
    }
    table
}

pub fn card_table(card: &Card) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("■").fg(hex_color(&card.swatch)),
            Cell::new(&card.title).add_attribute(Attribute::Bold),
            Cell::new(format!("#{}", card.task_id)),
        ]);
    if !card.description.is_empty() {
        table.add_row(vec![Cell::new(""), Cell::new(&card.description), Cell::new("")]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new(&card.meta).fg(priority_color(card.priority)),
        Cell::new(""),
    ]);
    table
}

pub fn calendar_table(grid: &MonthGrid) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(WEEKDAYS.iter().map(|d| Cell::new(d).add_attribute(Attribute::Bold)));
    for week in grid.weeks() {
        table.add_row(week.iter().map(|cell| match cell {
            None => Cell::new(""),
            Some(day) => {
                let mut text = day.day.to_string();
                for ev in &day.events {
                    text.push_str(&format!("\n• {}", ev.title));
                }
                let cell = Cell::new(text);
                match day.events.first() {
                    Some(ev) => cell.fg(hex_color(&ev.color)),
                    None => cell,
                }
            }
        }));
    }
    table
}

/// Text for a rendered view, as printed by `list`.
pub fn render_text(rendered: &Rendered) -> String {
    match rendered {
        Rendered::List(rows) if rows.is_empty() => "No tasks found.".to_string(),
        Rendered::List(rows) => list_table(rows).to_string(),
        Rendered::Cards(cards) if cards.is_empty() => "No tasks found.".to_string(),
        Rendered::Cards(cards) => cards
            .iter()
            .map(|c| card_table(c).to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Rendered::Calendar(grid) => format!("{}\n{}", grid.title, calendar_table(grid)),
    }
}

/// Lists tasks in the requested view.
pub async fn cmd_list<B: Backend>(store: &mut DataStore<B>, query: ListQuery) -> Result<()> {
    store.load().await?;
    let today = filter::today();
    let filtered = filter::visible(
        store.tasks(),
        &query.search,
        query.category.as_deref(),
        &query.filter,
        today,
    );
    let rendered = view::render(query.view, &filtered, store.tasks(), store.categories(), query.cursor);
    println!("{}", render_text(&rendered));
    Ok(())
}

/// Creates a task. Validation happens before any request is made.
pub async fn cmd_add<B: Backend>(store: &mut DataStore<B>, fields: TaskFields) -> Result<()> {
    let mut form = TaskForm::new(None, &[]);
    fields.apply(&mut form);
    let draft = form.collect()?;
    if draft.category_id.is_some() {
        store.load().await?;
        ensure_category(store.categories(), draft.category_id.as_deref())?;
    }
    store
        .create_task(&draft)
        .await
        .map_err(|e| anyhow!("Error saving task: {}", e))?;
    println!("Task '{}' added.", draft.title);
    Ok(())
}

/// Updates the given fields of a task, keeping the rest.
pub async fn cmd_edit<B: Backend>(store: &mut DataStore<B>, id: &str, fields: TaskFields) -> Result<()> {
    store.load().await?;
    let task = store.task(id).ok_or_else(|| anyhow!("Task {} not found.", id))?;
    let mut form = TaskForm::edit(task, store.categories());
    fields.apply(&mut form);
    let draft = form.collect()?;
    ensure_category(store.categories(), draft.category_id.as_deref())?;
    store
        .update_task(id, &draft)
        .await
        .map_err(|e| anyhow!("Error saving task: {}", e))?;
    println!("Task {} updated.", id);
    Ok(())
}

/// Deletes a task, asking for confirmation unless `force` is set.
pub async fn cmd_remove<B: Backend>(store: &mut DataStore<B>, id: &str, force: bool) -> Result<()> {
    if !force && !confirm("Delete task?")? {
        println!("Aborted.");
        return Ok(());
    }
    store.delete_task(id).await.map_err(|e| anyhow!("Error deleting: {}", e))?;
    println!("Task {} removed.", id);
    Ok(())
}

/// Prints the categories as a table, with how many tasks each holds.
pub async fn cmd_category_list<B: Backend>(store: &mut DataStore<B>) -> Result<()> {
    store.load().await?;
    if store.categories().is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name", "Color", "Tasks"]);
    for c in store.categories() {
        let count = store.tasks().iter().filter(|t| t.category_id.as_deref() == Some(c.id.as_str())).count();
        table.add_row(vec![
            Cell::new(&c.id),
            Cell::new(&c.name).fg(hex_color(&c.color)),
            Cell::new(&c.color),
            Cell::new(count),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Creates a category. The color defaults to the one the dialog preselects.
pub async fn cmd_category_add<B: Backend>(store: &mut DataStore<B>, name: String, color: Option<String>) -> Result<()> {
    let mut form = CategoryForm::new();
    form.name = name;
    if let Some(c) = color {
        form.color = c;
    }
    let draft = form.collect()?;
    store
        .create_category(&draft)
        .await
        .map_err(|e| anyhow!("Error saving category: {}", e))?;
    println!("Category '{}' added.", draft.name);
    Ok(())
}

/// Renames or recolors a category, keeping whatever is not given.
pub async fn cmd_category_edit<B: Backend>(
    store: &mut DataStore<B>,
    id: &str,
    name: Option<String>,
    color: Option<String>,
) -> Result<()> {
    store.load().await?;
    let cat = store.category(id).ok_or_else(|| anyhow!("Category {} not found.", id))?;
    let mut form = CategoryForm::edit(cat);
    if let Some(n) = name { form.name = n; }
    if let Some(c) = color { form.color = c; }
    let draft = form.collect()?;
    store
        .update_category(id, &draft)
        .await
        .map_err(|e| anyhow!("Error saving category: {}", e))?;
    println!("Category {} updated.", id);
    Ok(())
}

/// Deletes a category after confirmation. Its tasks are detached by the backend.
pub async fn cmd_category_remove<B: Backend>(store: &mut DataStore<B>, id: &str, force: bool) -> Result<()> {
    if !force && !confirm("Delete category? Tasks will be detached.")? {
        println!("Aborted.");
        return Ok(());
    }
    store
        .delete_category(id)
        .await
        .map_err(|e| anyhow!("Error deleting category: {}", e))?;
    println!("Category {} removed.", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::view::{Badge, CalendarCursor};
    use chrono::NaiveDate;

    #[test]
    fn list_text_has_rows_and_blank_category() {
        let rows = vec![ListRow {
            task_id: "1".into(),
            title: "Ship release".into(),
            project: String::new(),
            priority: Priority::Low,
            priority_class: "priority-low",
            date: String::new(),
            owner: String::new(),
            category: None,
        }];
        let text = render_text(&Rendered::List(rows));
        assert!(text.contains("Ship release"));
        assert!(text.contains("Low"));
        assert_eq!(render_text(&Rendered::List(vec![])), "No tasks found.");
    }

    #[test]
    fn list_text_shows_badge_name() {
        let rows = vec![ListRow {
            task_id: "1".into(),
            title: "Plan".into(),
            project: "Web".into(),
            priority: Priority::High,
            priority_class: "priority-high",
            date: "2024-03-01".into(),
            owner: "ana".into(),
            category: Some(Badge { name: "Work".into(), color: "#112233".into() }),
        }];
        assert!(render_text(&Rendered::List(rows)).contains("Work"));
    }

    #[test]
    fn calendar_text_has_title_and_days() {
        let grid = view::month_grid(CalendarCursor::new(2024, 5).unwrap(), &[], &[]);
        let text = render_text(&Rendered::Calendar(grid));
        assert!(text.starts_with("May 2024"));
        assert!(text.contains("Wed"));
        assert!(text.contains("31"));
    }

    #[test]
    fn task_fields_apply_and_detach() {
        let mut form = TaskForm::new(NaiveDate::from_ymd_opt(2024, 1, 1), &[]);
        form.category = Some("c".into());
        let fields = TaskFields { category: Some("none".into()), date: Some(String::new()), ..Default::default() };
        fields.apply(&mut form);
        assert_eq!(form.category, None);
        assert_eq!(form.date, "");
    }

    #[test]
    fn editing_a_task_whose_category_is_gone_passes_the_category_check() {
        let cats = vec![Category { id: "1".into(), name: "Work".into(), color: "#112233".into() }];
        let task = Task {
            id: "5".into(),
            title: "Orphan".into(),
            description: String::new(),
            project: String::new(),
            priority: Priority::Medium,
            owner: String::new(),
            category_id: Some("9".into()),
            date: None,
        };
        let mut form = TaskForm::edit(&task, &cats);
        TaskFields { owner: Some("bo".into()), ..Default::default() }.apply(&mut form);
        let draft = form.collect().unwrap();
        assert_eq!(draft.category_id, None);
        assert!(ensure_category(&cats, draft.category_id.as_deref()).is_ok());
        assert!(ensure_category(&cats, Some("9")).is_err());
    }
}
