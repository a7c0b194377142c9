use chrono::{NaiveDate, Utc};
use crochet_planner::{
    CalendarTimezone, Gauge, HOOK_SIZES, JsonPresetStore, PlanMode, PlanSettings, Planner,
    PresetStore, ProjectSpec, RuntimeConfig, StitchType, closest_us, logging,
    save_sessions_to_csv, us_to_mm,
};
use std::fs;
use std::io::{self, Write};
use std::str::FromStr;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show plan settings and project measurements\n  mode <beanie|blanket>              Choose what the milestones are planned for\n  start <YYYY-MM-DD>                 Set the start date\n  weeks <1-52>                       Set the duration in weeks\n  spw <1-14>                         Set sessions per week\n  hour <6-22>                        Set the session hour (24h)\n  tz <id>                            Set the calendar timezone\n  tz list                            List supported timezones\n  gauge <sts/in> <rows/in>           Set gauge in stitches and rows per inch\n  gauge metric <sts/10cm> <rows/10cm> Set gauge from a 10 cm swatch\n  beanie <circ_in> [ease] [multiple] [height_in]\n                                     Set beanie measurements\n  blanket <square_in> <width_in> <height_in> [yd_per_square]\n                                     Set granny blanket measurements\n  rect <width_in> <height_in> [sc|hdc|dc|tr|granny]\n                                     Set rectangle / wrap measurements\n  sizes                              Show sizing, layout and yardage\n  hook <US size>                     Convert a US hook size to mm\n  hook mm <mm>                       Find the closest US hook size\n  hook list                          List hook sizes\n  preview                            Show the session plan\n  export [path]                      Write the .ics calendar\n  csv <path>                         Write the session plan as CSV\n  preset save <name>                 Save settings and measurements\n  preset load <name>                 Load a saved preset\n  preset list                        List saved presets\n  preset delete <name>               Delete a saved preset\n  quit|exit                          Exit"
    );
}

fn print_settings(planner: &Planner) {
    let settings = &planner.settings;
    let work = planner.work();
    println!("Plan mode          : {}", settings.mode.tag());
    println!("Start date         : {}", settings.start_date);
    println!("Duration (weeks)   : {}", settings.weeks);
    println!("Sessions per week  : {}", settings.sessions_per_week);
    println!("Session hour       : {:02}:00", settings.session_hour);
    println!("Timezone           : {}", settings.timezone);
    println!("Total work         : {} {}", work.total_work, work.work_label);
}

fn print_sizes(planner: &Planner) {
    let project = &planner.project;
    let gauge = project.gauge;
    let sizing = project.beanie.sizing(&gauge);
    let layout = project.blanket.layout();
    println!(
        "Gauge              : {:.2} sts/in, {:.2} rows/in",
        gauge.sts_per_in, gauge.rows_per_in
    );
    println!("Beanie cast on     : {} sts around", sizing.cast_on);
    println!(
        "Beanie work to     : {} rows ({:.2} in)",
        sizing.rows, sizing.height_in
    );
    println!("Crown inc rounds   : {}", sizing.crown_increase_rounds);
    println!(
        "Blanket squares    : {} x {} = {}",
        layout.squares_wide, layout.squares_high, layout.total_squares
    );
    println!("Blanket yardage    : {:.0} yd", layout.total_yardage);
    let rect = project.rectangle;
    println!(
        "Rectangle          : {} x {} in ({} stitch), {:.1} sq in",
        rect.width_in,
        rect.height_in,
        rect.stitch,
        rect.area_in2()
    );
    println!("Rectangle yardage  : {:.0} yd", rect.yardage(&gauge));
}

fn print_preview(planner: &Planner) {
    match planner.session_plan() {
        Ok(plan) => {
            println!("Plan preview");
            if plan.sessions.is_empty() {
                println!("No sessions generated.");
            }
            for line in plan.preview_lines() {
                println!("{line}");
            }
            if plan.is_degenerate() {
                println!(
                    "Note: only {} of {} sessions fit after the start date ({} {} unassigned).",
                    plan.sessions.len(),
                    plan.requested_sessions,
                    plan.unassigned_work(),
                    plan.work_label
                );
            }
        }
        Err(err) => println!("Error: {err}"),
    }
}

/// Apply `mutator` to a copy of the settings and keep it only if it validates.
fn update_settings<F>(planner: &mut Planner, mutator: F) -> bool
where
    F: FnOnce(&mut PlanSettings),
{
    let mut settings = planner.settings.clone();
    mutator(&mut settings);
    match settings.validate() {
        Ok(()) => {
            planner.settings = settings;
            true
        }
        Err(err) => {
            println!("Error: {err}");
            false
        }
    }
}

/// Like [`update_settings`] for project measurements.
fn update_project<F>(planner: &mut Planner, mutator: F) -> bool
where
    F: FnOnce(&mut ProjectSpec),
{
    let mut project = planner.project;
    mutator(&mut project);
    match project.validate() {
        Ok(()) => {
            planner.project = project;
            true
        }
        Err(err) => {
            println!("Error: {err}");
            false
        }
    }
}

fn handle_hook(args: &[&str]) {
    match args {
        ["list"] => {
            for size in &HOOK_SIZES {
                println!("  {:<8} {} mm", size.us, size.mm);
            }
        }
        ["mm", value] => match value.parse::<f64>() {
            Ok(mm) if mm.is_finite() && mm > 0.0 => {
                let closest = closest_us(mm);
                println!("Closest US: {} ({} mm).", closest.us, closest.mm);
            }
            _ => println!("Error: mm must be a positive number"),
        },
        [us] => match us_to_mm(us) {
            Some(mm) => println!("{us} is {mm} mm."),
            None => println!("Error: unknown US hook size '{us}'"),
        },
        _ => println!("Usage: hook <US size> | hook mm <mm> | hook list"),
    }
}

fn parse_u32(value: Option<&str>, what: &str) -> Option<u32> {
    match value.map(str::parse::<u32>) {
        Some(Ok(v)) => Some(v),
        _ => {
            println!("Error: {what} must be a non-negative integer");
            None
        }
    }
}

fn parse_f64_arg(value: Option<&str>, what: &str) -> Option<f64> {
    match value.map(str::parse::<f64>) {
        Some(Ok(v)) if v.is_finite() && v > 0.0 => Some(v),
        _ => {
            println!("Error: {what} must be a positive number");
            None
        }
    }
}

fn handle_preset(planner: &mut Planner, store: &JsonPresetStore, args: &[&str]) {
    let name = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    match args.first().copied() {
        Some("save") => match store.save_preset(&name, planner) {
            Ok(()) => println!("Saved preset '{}'.", name.trim()),
            Err(err) => println!("Error: {err}"),
        },
        Some("load") => match store.fetch_preset(&name) {
            Ok(preset) => {
                *planner = preset;
                println!("Loaded preset '{}'.", name.trim());
            }
            Err(err) => println!("Error: {err}"),
        },
        Some("list") => match store.list_presets() {
            Ok(names) if names.is_empty() => println!("No presets saved."),
            Ok(names) => {
                for name in names {
                    println!("  {name}");
                }
            }
            Err(err) => println!("Error: {err}"),
        },
        Some("delete") => match store.delete_preset(&name) {
            Ok(true) => println!("Deleted preset '{}'.", name.trim()),
            Ok(false) => println!("Preset '{}' not found.", name.trim()),
            Err(err) => println!("Error: {err}"),
        },
        _ => println!("Usage: preset <save|load|list|delete> [name]"),
    }
}

fn export_calendar(planner: &Planner, path: Option<&str>) {
    let path = path.map_or_else(|| planner.file_name(), ToString::to_string);
    let document = match planner.calendar(Utc::now()) {
        Ok(document) => document,
        Err(err) => {
            println!("Error: {err}");
            return;
        }
    };
    match fs::write(&path, document.to_ics()) {
        Ok(()) => println!(
            "Calendar written to {path} ({} events).",
            document.events().len()
        ),
        Err(err) => println!("Failed to write {path}: {err}"),
    }
}

fn export_csv(planner: &Planner, path: Option<&str>) {
    let Some(path) = path else {
        println!("Usage: csv <path>");
        return;
    };
    let result = planner
        .slots()
        .map_err(|err| err.to_string())
        .and_then(|slots| save_sessions_to_csv(&slots, path).map_err(|err| err.to_string()));
    match result {
        Ok(()) => println!("Sessions written to {path}."),
        Err(err) => println!("Error: {err}"),
    }
}

fn main() {
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };
    logging::init_tracing(&config.log_level);
    let store = JsonPresetStore::new(&config.presets_path);
    let mut planner = Planner::default();

    println!("Crochet Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_ascii_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "help" | "h" | "?" => print_help(),
            "show" => print_settings(&planner),
            "mode" => match args.first().map(|m| PlanMode::from_str(m)) {
                Some(Ok(mode)) => {
                    planner.settings.mode = mode;
                    println!("Planning milestones for {}.", mode.tag());
                }
                Some(Err(err)) => println!("Error: {err}"),
                None => println!("Usage: mode <beanie|blanket>"),
            },
            "start" => match args
                .first()
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            {
                Some(Ok(date)) => {
                    if update_settings(&mut planner, |s| s.start_date = date) {
                        println!("Start date set to {date}.");
                    }
                }
                _ => println!("Usage: start <YYYY-MM-DD>"),
            },
            "weeks" => {
                if let Some(weeks) = parse_u32(args.first().copied(), "weeks") {
                    if update_settings(&mut planner, |s| s.weeks = weeks) {
                        println!("Duration set to {weeks} weeks.");
                    }
                }
            }
            "spw" => {
                if let Some(spw) = parse_u32(args.first().copied(), "sessions per week") {
                    if update_settings(&mut planner, |s| s.sessions_per_week = spw) {
                        println!("Sessions per week set to {spw}.");
                    }
                }
            }
            "hour" => {
                if let Some(hour) = parse_u32(args.first().copied(), "session hour") {
                    if update_settings(&mut planner, |s| s.session_hour = hour) {
                        println!("Session hour set to {hour:02}:00.");
                    }
                }
            }
            "tz" => match args.first().copied() {
                Some("list") => {
                    for tz in CalendarTimezone::ALL {
                        println!("  {tz}");
                    }
                }
                Some(id) => {
                    if update_settings(&mut planner, |s| s.timezone = id.to_string()) {
                        println!("Timezone set to {id}.");
                    }
                }
                None => println!("Usage: tz <id|list>"),
            },
            "gauge" => {
                let (metric, values) = match args.first().copied() {
                    Some("metric") => (true, &args[1..]),
                    _ => (false, args),
                };
                let sts = parse_f64_arg(values.first().copied(), "stitch gauge");
                let rows = sts.and_then(|_| parse_f64_arg(values.get(1).copied(), "row gauge"));
                if let (Some(sts), Some(rows)) = (sts, rows) {
                    let gauge = if metric {
                        Gauge::from_metric(sts, rows)
                    } else {
                        Gauge::new(sts, rows)
                    };
                    if !update_project(&mut planner, |p| p.gauge = gauge) {
                        continue;
                    }
                    println!(
                        "Gauge set to {:.2} sts/in, {:.2} rows/in.",
                        gauge.sts_per_in, gauge.rows_per_in
                    );
                }
            }
            "beanie" => {
                let Some(circ) = parse_f64_arg(args.first().copied(), "head circumference") else {
                    continue;
                };
                let mut beanie = planner.project.beanie;
                beanie.head_circumference_in = circ;
                beanie.height_in = None;
                if let Some(ease) = args.get(1).and_then(|v| v.parse::<f64>().ok()) {
                    beanie.ease = ease;
                }
                if let Some(multiple) = args.get(2).and_then(|v| v.parse::<u32>().ok()) {
                    beanie.multiple = multiple;
                }
                if let Some(height) = args.get(3).and_then(|v| v.parse::<f64>().ok()) {
                    beanie.height_in = Some(height);
                }
                if !update_project(&mut planner, |p| p.beanie = beanie) {
                    continue;
                }
                let sizing = beanie.sizing(&planner.project.gauge);
                println!(
                    "Beanie: cast on {} sts, work to {} rows.",
                    sizing.cast_on, sizing.rows
                );
            }
            "blanket" => {
                let square = parse_f64_arg(args.first().copied(), "square size");
                let width = square.and_then(|_| parse_f64_arg(args.get(1).copied(), "width"));
                let height = width.and_then(|_| parse_f64_arg(args.get(2).copied(), "height"));
                if let (Some(square), Some(width), Some(height)) = (square, width, height) {
                    let mut blanket = planner.project.blanket;
                    blanket.square_in = square;
                    blanket.width_in = width;
                    blanket.height_in = height;
                    if let Some(yards) = args.get(3).and_then(|v| v.parse::<f64>().ok()) {
                        blanket.yardage_per_square = yards;
                    }
                    if !update_project(&mut planner, |p| p.blanket = blanket) {
                        continue;
                    }
                    let layout = blanket.layout();
                    println!(
                        "Blanket: {} x {} = {} squares.",
                        layout.squares_wide, layout.squares_high, layout.total_squares
                    );
                }
            }
            "rect" => {
                let width = parse_f64_arg(args.first().copied(), "width");
                let height = width.and_then(|_| parse_f64_arg(args.get(1).copied(), "height"));
                let stitch = match args.get(2).map(|v| StitchType::from_str(v)) {
                    Some(Ok(stitch)) => Some(stitch),
                    Some(Err(err)) => {
                        println!("Error: {err}");
                        None
                    }
                    None => Some(planner.project.rectangle.stitch),
                };
                if let (Some(width), Some(height), Some(stitch)) = (width, height, stitch) {
                    let updated = update_project(&mut planner, |p| {
                        p.rectangle.width_in = width;
                        p.rectangle.height_in = height;
                        p.rectangle.stitch = stitch;
                    });
                    if updated {
                        let rect = planner.project.rectangle;
                        println!(
                            "Rectangle: {:.1} sq in, about {:.0} yd in {}.",
                            rect.area_in2(),
                            rect.yardage(&planner.project.gauge),
                            rect.stitch
                        );
                    }
                }
            }
            "sizes" => print_sizes(&planner),
            "hook" => handle_hook(args),
            "preview" => print_preview(&planner),
            "export" => export_calendar(&planner, args.first().copied()),
            "csv" => export_csv(&planner, args.first().copied()),
            "preset" => handle_preset(&mut planner, &store, args),
            "quit" | "exit" => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
