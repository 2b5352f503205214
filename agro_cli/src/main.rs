use agro_core::*;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agro")]
#[command(about = "Agroflora soil monitoring dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dashboard user
    #[arg(long, global = true)]
    username: Option<String>,

    /// Dashboard password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible readings
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of days of readings to generate
    #[arg(long, global = true)]
    days: Option<u32>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current soil summary (default)
    Dashboard,

    /// List every reading in the window
    Readings,

    /// Recommend tree species for the current or a simulated reading
    Recommend {
        /// Simulated pH
        #[arg(long)]
        ph: Option<f64>,

        /// Simulated nitrogen (ppm)
        #[arg(long)]
        nitrogen: Option<f64>,

        /// Simulated phosphorus (ppm)
        #[arg(long)]
        phosphorus: Option<f64>,

        /// Simulated potassium (ppm)
        #[arg(long)]
        potassium: Option<f64>,
    },

    /// Show pest advisories and the infestation map
    Pests {
        /// Show the advisory for one pest
        #[arg(long)]
        name: Option<String>,

        /// Register the suggested treatment for --name
        #[arg(long, requires = "name")]
        apply: bool,
    },

    /// Export the readings as a spreadsheet
    Export {
        /// Output file (defaults to the configured export path)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Container format: xlsx or csv (defaults to the configured format)
        #[arg(long)]
        format: Option<ExportFormat>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    agro_core::logging::init();

    let cli = Cli::parse();

    let user = login(cli.username.as_deref(), cli.password.as_deref())?;
    tracing::info!("Signed in as {}", user.username);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(seed) = cli.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(days) = cli.days {
        config.generator.window_days = days;
    }
    config.validate()?;

    let readings = load_readings(&config)?;

    match cli.command {
        Some(Commands::Readings) => cmd_readings(&readings, cli.json),
        Some(Commands::Recommend {
            ph,
            nitrogen,
            phosphorus,
            potassium,
        }) => cmd_recommend(
            &config,
            &readings,
            [ph, nitrogen, phosphorus, potassium],
            cli.json,
        ),
        Some(Commands::Pests { name, apply }) => cmd_pests(&config, name, apply, cli.json),
        Some(Commands::Export { out, format }) => cmd_export(&config, &readings, out, format),
        Some(Commands::Dashboard) | None => cmd_dashboard(&user, &readings, cli.json),
    }
}

fn login(username: Option<&str>, password: Option<&str>) -> Result<AuthenticatedUser> {
    let (Some(username), Some(password)) = (username, password) else {
        eprintln!("Access restricted: pass --username and --password");
        return Err(Error::Authentication("missing credentials".into()));
    };

    match default_user_store().verify(username, password) {
        Ok(user) => Ok(user),
        Err(e @ Error::NotFound { .. }) => {
            eprintln!("User not found: {}", username);
            Err(e)
        }
        Err(e) => {
            eprintln!("Incorrect password");
            Err(e)
        }
    }
}

fn load_readings(config: &Config) -> Result<Vec<SoilReading>> {
    let mut rng: Box<dyn RngCore> = match config.generator.seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    };
    let today = chrono::Local::now().date_naive();

    generate_readings(
        config.generator.window_days,
        today,
        &config.generator.fields,
        rng.as_mut(),
    )
}

fn cmd_dashboard(user: &AuthenticatedUser, readings: &[SoilReading], json: bool) -> Result<()> {
    let Some(current) = current_reading(readings) else {
        println!("No readings available.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(current)?);
        return Ok(());
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  AGROFLORA DASHBOARD");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Welcome, {} (access: {})", user.display_name, user.access);
    println!("  Last update: {}", current.date.format("%d/%m/%Y"));
    println!();

    for field in [
        SoilField::Ph,
        SoilField::OrganicMatter,
        SoilField::Humidity,
        SoilField::Temperature,
    ] {
        let change = latest_change(readings, field)
            .map(|delta| format!(" ({:+.1})", delta))
            .unwrap_or_default();
        println!("  {:<22} {:>8.1}{}", field.label(), current.get(field), change);
    }

    println!();
    println!("  Macronutrients");
    for field in [
        SoilField::Nitrogen,
        SoilField::Phosphorus,
        SoilField::Potassium,
        SoilField::Calcium,
        SoilField::Magnesium,
    ] {
        println!("    {:<22} {:>8.1}", field.label(), current.get(field));
    }

    println!();
    println!("  Physical indicators");
    println!("    {:<22} {:>7.1}%", "Matéria Orgânica", current.organic_matter);
    println!("    {:<22} {:>7.1}%", "Umidade", current.humidity);
    println!("    {:<22} {:>7.1}%", "Outros Componentes", current.other_components_pct());
    println!();

    Ok(())
}

fn cmd_readings(readings: &[SoilReading], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(readings)?);
        return Ok(());
    }

    print!("{:<12}", "Data");
    for field in SoilField::ALL {
        print!(" {:>10}", short_label(field));
    }
    println!();

    for reading in readings {
        print!("{:<12}", reading.date.format("%Y-%m-%d").to_string());
        for field in SoilField::ALL {
            print!(" {:>10.2}", reading.get(field));
        }
        println!();
    }

    Ok(())
}

fn short_label(field: SoilField) -> &'static str {
    match field {
        SoilField::Ph => "pH",
        SoilField::Nitrogen => "N",
        SoilField::Phosphorus => "P",
        SoilField::Potassium => "K",
        SoilField::Calcium => "Ca",
        SoilField::Magnesium => "Mg",
        SoilField::OrganicMatter => "MO%",
        SoilField::Humidity => "Umid%",
        SoilField::Temperature => "Temp°C",
    }
}

fn cmd_recommend(
    config: &Config,
    readings: &[SoilReading],
    simulated: [Option<f64>; 4],
    json: bool,
) -> Result<()> {
    let catalog = config.species_catalog()?;

    let result = match simulated {
        [None, None, None, None] => match current_reading(readings) {
            Some(current) => recommend(current, &catalog),
            None => {
                println!("No readings available.");
                return Ok(());
            }
        },
        [Some(ph), Some(n), Some(p), Some(k)] => {
            simulated_reading(ph, n, p, k).and_then(|reading| recommend(&reading, &catalog))
        }
        partial => {
            bounded_partial_reading(partial).and_then(|reading| recommend(&reading, &catalog))
        }
    };

    let recommendations = match result {
        Ok(recommendations) => recommendations,
        Err(Error::InvalidInput(msg)) => {
            eprintln!("Cannot recommend species: {}", msg);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No species suits the current soil conditions. Consider correcting the soil parameters.");
        return Ok(());
    }

    println!("Species suited to this soil:");
    for rec in &recommendations {
        display_recommendation(rec);
    }

    Ok(())
}

fn display_recommendation(rec: &Recommendation<'_>) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", rec.species);
    println!("╰─────────────────────────────────────────╯");
    println!("  Productivity: {}", rec.productivity);
    println!("  Cycle:        {}", rec.cycle);
    println!("  Uses:         {}", rec.uses);

    if let Some(guide) = rec.cultivation {
        println!();
        println!("  Planting density: {}", guide.planting_density);
        println!("  Spacing:          {}", guide.spacing);
        println!("  Fertilization:");
        for step in &guide.fertilization {
            println!("    - {}", step);
        }
        println!("  Special care:     {}", guide.special_care);
    }
}

fn cmd_pests(config: &Config, name: Option<String>, apply: bool, json: bool) -> Result<()> {
    let table = config.pest_table()?;

    let Some(name) = name else {
        if json {
            println!("{}", serde_json::to_string_pretty(&*table)?);
            return Ok(());
        }

        println!(
            "{:<22} {:<10} {:<10} {:<8} Treatment",
            "Pest", "Severity", "Sector", "Days"
        );
        for pest in &table.pests {
            println!(
                "{:<22} {:<10} {:<10} {:<8} {}",
                pest.name,
                pest.severity,
                pest.affected_sector,
                pest.days_since_detection,
                pest.treatment
            );
        }

        if !table.sectors.is_empty() {
            println!();
            println!("Infestation map");
            for sector in &table.sectors {
                let pests: Vec<&str> = table
                    .in_sector(&sector.sector)
                    .map(|p| p.name.as_str())
                    .collect();
                println!(
                    "  Setor {:<3} {:<8} ({:.5}, {:.5})  {}",
                    sector.sector,
                    sector.level,
                    sector.latitude,
                    sector.longitude,
                    if pests.is_empty() { "-".to_string() } else { pests.join(", ") }
                );
            }
        }
        return Ok(());
    };

    let advisory = match table.lookup(&name) {
        Ok(advisory) => advisory,
        Err(e @ Error::NotFound { .. }) => {
            eprintln!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(advisory)?);
    } else {
        println!("Pest:           {}", advisory.name);
        println!("Severity:       {}", advisory.severity);
        println!("Affected area:  {}", advisory.affected_sector);
        println!("Last detection: {} days ago", advisory.days_since_detection);
        println!("Treatment:      {}", advisory.treatment);
    }

    if apply {
        let application = register_treatment(&table, &name)?;
        println!("\n✓ {}", application.message());
    }

    Ok(())
}

fn cmd_export(
    config: &Config,
    readings: &[SoilReading],
    out: Option<PathBuf>,
    format: Option<ExportFormat>,
) -> Result<()> {
    let mut export = config.export.clone();
    if let Some(format) = format {
        export.format = format;
    }
    let path = out.unwrap_or_else(|| export.path());
    let count = export_readings(readings, &path, export.format)?;

    println!("✓ Exported {} readings", count);
    println!("  {}: {}", export.format.extension().to_uppercase(), path.display());

    Ok(())
}
