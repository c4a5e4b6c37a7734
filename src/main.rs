use anyhow::Context;

fn main() -> anyhow::Result<()> {
    marquee::logging::init();
    let cli = marquee::cli::parse();

    let summary = marquee::run(&cli).with_context(|| {
        format!(
            "failed to {} {} with {}",
            cli.operation.name(),
            cli.image.display(),
            cli.session.display()
        )
    })?;

    tracing::info!(
        x = summary.bounds.x,
        y = summary.bounds.y,
        width = summary.bounds.width,
        height = summary.bounds.height,
        output_width = summary.output_width,
        output_height = summary.output_height,
        "done"
    );
    Ok(())
}
