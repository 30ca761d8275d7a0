use console::Style;
use rbcfilt_core::pipeline::{BatchConfig, BatchReport};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            error: Style::new().red(),
        }
    }
}

pub fn print_batch_summary(config: &BatchConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("RBC Frequency Filter"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.path.apply_to(config.frames.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Boundary"),
        s.path.apply_to(config.boundary.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Edge"),
        s.method.apply_to(config.edge_policy)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Records"),
        s.method.apply_to(config.layout)
    );
    println!();

    println!("  {}", s.header.apply_to("Filters"));
    for (i, spec) in config.filters.iter().enumerate() {
        println!(
            "    {}. {}",
            s.label.apply_to(i + 1),
            s.value.apply_to(spec)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Export"));
    if config.export.writes_coords() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Coords"),
            s.value.apply_to("enabled")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Coords"),
            s.disabled.apply_to("disabled")
        );
    }
    match config.export.chomp {
        Some(ref chomp) => println!(
            "    {:<12}{}",
            s.label.apply_to("Homology"),
            s.method.apply_to(&chomp.program)
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Homology"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

pub fn print_batch_report(report: &BatchReport, config: &BatchConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Results"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Filtered"),
        s.value.apply_to(report.succeeded())
    );
    if report.failed() == 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Skipped"),
            s.disabled.apply_to("none")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Skipped"),
            s.error.apply_to(report.failed())
        );
        for failure in &report.failures {
            let filter = failure
                .spec
                .map(|spec| spec.to_string())
                .unwrap_or_else(|| "all filters".into());
            println!(
                "      {} ({}): {}",
                s.path.apply_to(failure.source.display()),
                s.label.apply_to(filter),
                s.error.apply_to(&failure.reason)
            );
        }
    }
    for path in &report.combined {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Combined"),
            s.path.apply_to(path.display())
        );
    }
    println!();
    println!("Output saved to {}", config.output.display());
}
