//! `lendsqr users` command - Browse and moderate users

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_config, open_dashboard};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{DetailView, PageRequest, PageResult, SortKey, SortOrder, StatusCounts, UserFilters};
use crate::entities::{User, UserStatus};

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// List users with search, filtering, sorting and paging
    List(ListArgs),

    /// Show a user's details (served from the cache once opened)
    Show(ShowArgs),

    /// Change a user's status
    Status(StatusArgs),

    /// Show user counts by status
    Stats,
}

/// Columns available for list output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListColumn {
    Id,
    Organization,
    Username,
    Name,
    Email,
    Phone,
    Joined,
    Status,
    Tier,
    Balance,
    Bank,
}

impl ListColumn {
    fn def(&self) -> ColumnDef {
        match self {
            ListColumn::Id => ColumnDef::new("id", "ID", 10),
            ListColumn::Organization => ColumnDef::new("organization", "ORGANIZATION", 14),
            ListColumn::Username => ColumnDef::new("username", "USERNAME", 20),
            ListColumn::Name => ColumnDef::new("name", "NAME", 24),
            ListColumn::Email => ColumnDef::new("email", "EMAIL", 30),
            ListColumn::Phone => ColumnDef::new("phone", "PHONE", 14),
            ListColumn::Joined => ColumnDef::new("joined", "JOINED", 12),
            ListColumn::Status => ColumnDef::new("status", "STATUS", 12),
            ListColumn::Tier => ColumnDef::new("tier", "TIER", 6),
            ListColumn::Balance => ColumnDef::new("balance", "BALANCE", 14),
            ListColumn::Bank => ColumnDef::new("bank", "BANK", 18),
        }
    }
}

/// Default columns for user tables
pub(crate) const DEFAULT_COLUMNS: &[ListColumn] = &[
    ListColumn::Id,
    ListColumn::Organization,
    ListColumn::Username,
    ListColumn::Email,
    ListColumn::Phone,
    ListColumn::Joined,
    ListColumn::Status,
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    // ========== FILTERING OPTIONS ==========

    /// Search name, email, username, organization and phone
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by organization (case-insensitive substring)
    #[arg(long)]
    pub org: Option<String>,

    /// Filter by username (case-insensitive substring)
    #[arg(long)]
    pub username: Option<String>,

    /// Filter by email (case-insensitive substring)
    #[arg(long)]
    pub email: Option<String>,

    /// Filter by phone number (substring)
    #[arg(long)]
    pub phone: Option<String>,

    /// Filter by join date (YYYY-MM-DD, exact)
    #[arg(long)]
    pub joined: Option<NaiveDate>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<UserStatus>,

    // ========== OUTPUT CONTROL ==========

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<ListColumn>,

    /// Sort by field (e.g. dateJoined, username, status, tier)
    #[arg(long, default_value = "dateJoined")]
    pub sort: SortKey,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Page number, starting at 1
    #[arg(long, short = 'p', default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Users per page (default: configured page size)
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

impl ListArgs {
    fn filters(&self) -> UserFilters {
        UserFilters {
            organization: self.org.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone_number: self.phone.clone(),
            date_joined: self.joined,
            status: self.status,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// User ID (e.g. user_1)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// User ID (e.g. user_1)
    pub id: String,

    /// New status (active, inactive, pending, blacklisted)
    pub status: UserStatus,
}

pub fn run(cmd: UsersCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UsersCommands::List(args) => run_list(args, global),
        UsersCommands::Show(args) => run_show(args, global),
        UsersCommands::Status(args) => run_status(args, global),
        UsersCommands::Stats => run_stats(global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let dashboard = open_dashboard(&config)?;

    let order = if args.asc { SortOrder::Asc } else { SortOrder::Desc };
    let request = PageRequest::new()
        .page(args.page)
        .limit(args.limit.unwrap_or_else(|| config.page_size()))
        .search(args.search.clone().unwrap_or_default())
        .filters(args.filters())
        .sort(args.sort, order);

    let result = dashboard.list(&request);

    if args.count {
        println!("{}", result.total);
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&result).into_diagnostic()?);
        }
        format => {
            let columns = if args.columns.is_empty() {
                DEFAULT_COLUMNS
            } else {
                &args.columns[..]
            };
            print_users(&result.users, columns, format);
            if !global.quiet && matches!(format, OutputFormat::Auto | OutputFormat::Tsv) {
                print_page_summary(&result);
            }
        }
    }

    Ok(())
}

fn print_page_summary(result: &PageResult) {
    println!();
    if result.total == 0 {
        println!("No users found.");
        return;
    }
    println!(
        "{} of {} user(s), page {} of {}",
        style(result.users.len()).cyan(),
        style(result.total).cyan(),
        result.page,
        result.total_pages
    );
}

/// Print users as a table in `format`
pub(crate) fn print_users(users: &[User], columns: &[ListColumn], format: OutputFormat) {
    let defs: Vec<ColumnDef> = columns.iter().map(ListColumn::def).collect();
    let rows = users.iter().map(user_row);
    TableFormatter::new(&defs, "user")
        .without_summary()
        .output(rows, format);
}

fn user_row(user: &User) -> TableRow {
    TableRow::new(&user.id)
        .cell("id", CellValue::Text(user.id.clone()))
        .cell("organization", CellValue::Text(user.organization.clone()))
        .cell("username", CellValue::Text(user.username.clone()))
        .cell("name", CellValue::Text(user.full_name().to_string()))
        .cell("email", CellValue::Text(user.email.clone()))
        .cell("phone", CellValue::Text(user.phone_number.clone()))
        .cell("joined", CellValue::Date(user.date_joined))
        .cell("status", CellValue::Status(user.status))
        .cell("tier", CellValue::Number(user.tier))
        .cell("balance", CellValue::Text(user.account_balance.clone()))
        .cell("bank", CellValue::Text(user.bank_name.clone()))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let mut dashboard = open_dashboard(&load_config(global))?;

    let view = dashboard
        .open_detail(&args.id)
        .into_diagnostic()?
        .ok_or_else(|| miette::miette!("No user found with ID '{}'", args.id))?;

    // Output based on format
    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Yaml, // Default to YAML for show
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&view).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", view.user.id);
        }
        _ => print_detail(&view),
    }

    Ok(())
}

fn print_detail(view: &DetailView) {
    let user = &view.user;
    let personal = &user.personal_info;
    let work = &user.education_and_employment;

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&user.id).cyan());
    println!("{}: {}", style("Name").bold(), style(user.full_name()).yellow());
    println!("{}: {}", style("Username").bold(), user.username);
    println!("{}: {}", style("Organization").bold(), user.organization);
    println!("{}: {}", style("Status").bold(), user.status);
    println!("{}: {}", style("Tier").bold(), user.tier);
    println!("{}: {}", style("Joined").bold(), user.date_joined);
    if !user.account_balance.is_empty() {
        println!(
            "{}: {} ({} {})",
            style("Account").bold(),
            user.account_balance,
            user.account_number,
            user.bank_name
        );
    }
    println!("{}", style("─".repeat(60)).dim());

    println!("{}", style("Personal Information").bold());
    println!("  Email:      {}", personal.email);
    println!("  Phone:      {}", personal.phone_number);
    println!("  BVN:        {}", personal.bvn);
    println!("  Gender:     {:?}", personal.gender);
    println!("  Marital:    {:?}", personal.marital_status);
    println!("  Children:   {}", personal.children);
    println!("  Residence:  {}", personal.type_of_residence);
    println!();

    println!("{}", style("Education and Employment").bold());
    println!("  Education:  {}", work.level_of_education);
    println!("  Employment: {}", work.employment_status);
    println!("  Sector:     {}", work.sector_of_employment);
    println!("  Duration:   {}", work.duration_of_employment);
    println!("  Income:     {}", work.monthly_income);
    println!("  Repayment:  {}", work.loan_repayment);
    println!();

    if !user.guarantors.is_empty() {
        println!("{}", style("Guarantors").bold());
        for g in &user.guarantors {
            println!(
                "  • {} ({}) {} {}",
                g.full_name, g.relationship, g.phone_number, g.email_address
            );
        }
        println!();
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}{}",
        style("Views").bold(),
        view.view_count,
        if view.is_favorite {
            format!("  {}", style("★ favorite").yellow())
        } else {
            String::new()
        }
    );
    if !view.tags.is_empty() {
        println!("{}: {}", style("Tags").bold(), view.tags.join(", "));
    }
    if !view.notes.is_empty() {
        println!("{}:", style("Notes").bold());
        println!("{}", view.notes);
    }
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let mut dashboard = open_dashboard(&load_config(global))?;
    let was_cached = dashboard.cache().get_record(&args.id).is_some();

    let user = dashboard
        .change_status(&args.id, args.status)
        .into_diagnostic()?
        .ok_or_else(|| miette::miette!("No user found with ID '{}'", args.id))?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&user).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&user).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", user.id),
        _ => {
            if !global.quiet {
                println!(
                    "{} {} is now {}",
                    style("✓").green(),
                    style(&user.id).cyan(),
                    user.status
                );
                if !was_cached {
                    println!(
                        "  {}",
                        style(format!(
                            "{} is not cached; run `lendsqr users show {}` first to keep the change",
                            user.id, user.id
                        ))
                        .dim()
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_stats(global: &GlobalOpts) -> Result<()> {
    let dashboard = open_dashboard(&load_config(global))?;
    let counts = dashboard.status_counts();

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&counts).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&counts).into_diagnostic()?);
        }
        _ => print_counts(&counts),
    }

    Ok(())
}

fn print_counts(counts: &StatusCounts) {
    println!("{}", style("Users").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Total:        {}", style(counts.total).cyan());
    for status in UserStatus::all() {
        println!(
            "  {:<13} {}",
            format!("{}:", capitalize(status.as_str())),
            counts.get(*status)
        );
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
