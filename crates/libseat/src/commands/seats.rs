use tabled::Tabled;

use libseat_core::AppContext;

use crate::cli::{GlobalOpts, SeatsArgs, SeatsCommand};
use crate::error::CliError;
use crate::output::{self, Painter, Tone};

use super::util;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Available")]
    available: String,
}

pub async fn handle(ctx: &AppContext, args: SeatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(global.color);

    match args.command {
        SeatsCommand::Availability { seat, date } => {
            let date = date.unwrap_or_else(util::today);
            let id = util::entity_id(&seat);
            let slots = util::fetch(
                "Checking availability",
                global,
                ctx.client().seat_availability(&id, date),
            )
            .await?;

            let out = output::render_list(
                global.output,
                &slots,
                |s| SlotRow {
                    start: util::hhmm(s.start_time),
                    end: util::hhmm(s.end_time),
                    available: if s.is_available {
                        painter.paint("yes", Tone::Good)
                    } else {
                        painter.paint("no", Tone::Muted)
                    },
                },
                |s| format!("{}-{}", util::hhmm(s.start_time), util::hhmm(s.end_time)),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
