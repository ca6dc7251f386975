use tabled::Tabled;

use crate::cli::{ListArgs, OutputFormat};
use crate::error::Result;
use crate::output::{self, strip_control, truncate};
use crate::query::{FeedQuery, PageSource};
use crate::types::User;
use crate::view::EMPTY_MESSAGE;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Affiliation")]
    affiliation: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: strip_control(&user.full_name()),
            email: strip_control(&user.email),
            phone: strip_control(&user.phone),
            affiliation: truncate(&strip_control(&user.affiliation()), 50),
        }
    }
}

/// Load pages until `limit` users are available and return at most that many,
/// along with the server-reported total.
pub async fn collect<S: PageSource>(source: &S, limit: Option<usize>) -> Result<(Vec<User>, usize)> {
    let mut query = FeedQuery::new();
    query.load_until(source, limit).await?;

    let users = query
        .users()
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Ok((users, query.total()))
}

pub async fn run<S: PageSource>(source: &S, args: &ListArgs) -> Result<()> {
    let (users, total) = collect(source, args.limit()).await?;

    if users.is_empty() && output::format() != OutputFormat::Json {
        output::print_message(EMPTY_MESSAGE);
        return Ok(());
    }

    output::print_table(&users, |user| UserRow::from(user), |user| {
        format!(
            "{}\t{}\t{}",
            user.id,
            strip_control(&user.full_name()),
            strip_control(&user.email)
        )
    });

    if output::format() == OutputFormat::Table {
        output::print_message(&format!("Showing {} of {} users", users.len(), total));
    }

    Ok(())
}
