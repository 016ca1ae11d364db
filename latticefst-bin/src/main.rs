use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use structopt::StructOpt;

use latticefst::fst::io::probe_kind;
use latticefst::fst::{text, ConstFst, Fst, VectorFst};
use latticefst::ops::{
    arc_sort, compose_filtered, connect, n_shortest_paths, project, ProjectType, SortBy,
};
use latticefst::semiring::{LogWeight, Semiring, SemiringKind, TropicalWeight};
use latticefst::{Label, StateId, EPSILON};

#[derive(Debug, StructOpt)]
#[structopt(name = "latticefst", about = "Weighted FST model toolkit.")]
enum Opts {
    #[structopt(about = "Print summary information for a model")]
    Info {
        #[structopt(parse(from_os_str))]
        model: PathBuf,
    },

    #[structopt(about = "Dump a model as text, one line per arc")]
    Print {
        #[structopt(parse(from_os_str))]
        model: PathBuf,
    },

    #[structopt(about = "Sort every state's arcs by input (default) or output label")]
    Arcsort {
        #[structopt(parse(from_os_str))]
        model: PathBuf,

        #[structopt(parse(from_os_str))]
        output: PathBuf,

        #[structopt(long, help = "Sort by output label instead of input label")]
        olabel: bool,
    },

    #[structopt(about = "Compose two models with epsilon filtering")]
    Compose {
        #[structopt(parse(from_os_str))]
        left: PathBuf,

        #[structopt(parse(from_os_str))]
        right: PathBuf,

        #[structopt(parse(from_os_str))]
        output: PathBuf,
    },

    #[structopt(about = "Remove states that neither extend from the start nor reach a final")]
    Connect {
        #[structopt(parse(from_os_str))]
        model: PathBuf,

        #[structopt(parse(from_os_str))]
        output: PathBuf,
    },

    #[structopt(about = "Collapse a transducer onto one label side")]
    Project {
        #[structopt(parse(from_os_str))]
        model: PathBuf,

        #[structopt(parse(from_os_str))]
        output: PathBuf,

        #[structopt(long, help = "Project onto the output side instead of the input side")]
        output_side: bool,
    },

    #[structopt(about = "Extract the n cheapest accepted paths")]
    Shortest {
        #[structopt(parse(from_os_str))]
        model: PathBuf,

        #[structopt(short = "n", long = "nbest", default_value = "1")]
        n: usize,

        #[structopt(long, help = "Emit results as JSON")]
        json: bool,
    },
}

fn semiring_of(path: &Path) -> Result<SemiringKind> {
    let tag = probe_kind(path)
        .with_context(|| format!("failed to read model header from {}", path.display()))?;
    SemiringKind::from_tag(tag).ok_or_else(|| anyhow!("unknown semiring tag {}", tag))
}

fn load<W: Semiring>(path: &Path) -> Result<ConstFst<W>> {
    ConstFst::read_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn info<W: Semiring>(path: &Path) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    let num_arcs: usize = (0..fst.num_states() as StateId)
        .map(|s| fst.num_arcs(s))
        .sum();
    let num_finals = (0..fst.num_states() as StateId)
        .filter(|&s| fst.is_final(s))
        .count();
    println!("semiring:       {:?}", W::KIND);
    println!("states:         {}", fst.num_states());
    println!("arcs:           {}", num_arcs);
    println!("final states:   {}", num_finals);
    match fst.start() {
        Some(start) => println!("start state:    {}", start),
        None => println!("start state:    (none)"),
    }
    println!("input symbols:  {}", fst.input_symbols().len());
    println!("output symbols: {}", fst.output_symbols().len());
    Ok(())
}

fn print<W: Semiring>(path: &Path) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    println!("{}", text(&fst));
    Ok(())
}

fn arcsort<W: Semiring>(path: &Path, output: &Path, olabel: bool) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    let mut fst = VectorFst::from_fst(&fst);
    let by = if olabel { SortBy::OLabel } else { SortBy::ILabel };
    arc_sort(&mut fst, by);
    fst.write_path(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

fn compose_models<W: Semiring>(left: &Path, right: &Path, output: &Path) -> Result<()> {
    let a: ConstFst<W> = load(left)?;
    let b: ConstFst<W> = load(right)?;
    match compose_filtered(&a, &b) {
        Some(composed) => {
            eprintln!(
                "composed {} x {} -> {} states",
                a.num_states(),
                b.num_states(),
                composed.num_states()
            );
            composed
                .write_path(output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            Ok(())
        }
        None => bail!("models cannot be composed; do their symbol tables agree?"),
    }
}

fn connect_model<W: Semiring>(path: &Path, output: &Path) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    let trimmed = connect(&fst);
    eprintln!(
        "trimmed {} -> {} states",
        fst.num_states(),
        trimmed.num_states()
    );
    trimmed
        .write_path(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

fn project_model<W: Semiring>(path: &Path, output: &Path, output_side: bool) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    let mut fst = VectorFst::from_fst(&fst);
    let ptype = if output_side {
        ProjectType::Output
    } else {
        ProjectType::Input
    };
    project(&mut fst, ptype);
    fst.write_path(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

#[derive(Serialize)]
struct PathRecord {
    input: String,
    output: String,
    weight: f32,
}

fn collect_paths<W: Semiring, F: Fst<W>>(
    fst: &F,
    state: StateId,
    ilabels: &mut Vec<Label>,
    olabels: &mut Vec<Label>,
    weight: W,
    records: &mut Vec<PathRecord>,
) {
    if fst.is_final(state) {
        records.push(PathRecord {
            input: fst.input_symbols().string_from_labels(ilabels).to_string(),
            output: fst
                .output_symbols()
                .string_from_labels(olabels)
                .to_string(),
            weight: weight.times(fst.final_weight(state)).value(),
        });
    }
    for arc in fst.arcs(state) {
        if arc.ilabel != EPSILON {
            ilabels.push(arc.ilabel);
        }
        if arc.olabel != EPSILON {
            olabels.push(arc.olabel);
        }
        collect_paths(
            fst,
            arc.nextstate,
            ilabels,
            olabels,
            weight.times(arc.weight),
            records,
        );
        if arc.ilabel != EPSILON {
            ilabels.pop();
        }
        if arc.olabel != EPSILON {
            olabels.pop();
        }
    }
}

fn shortest<W: Semiring>(path: &Path, n: usize, json: bool) -> Result<()> {
    let fst: ConstFst<W> = load(path)?;
    let best = match n_shortest_paths(&fst, n) {
        Some(best) => best,
        None => bail!("model accepts no paths"),
    };
    let mut records = vec![];
    if let Some(start) = best.start() {
        collect_paths(&best, start, &mut vec![], &mut vec![], W::one(), &mut records);
    }
    records.sort_by(|a, b| {
        a.weight
            .partial_cmp(&b.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}\t{}\t{}", record.input, record.output, record.weight);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::from_args() {
        Opts::Info { model } => match semiring_of(&model)? {
            SemiringKind::Tropical => info::<TropicalWeight>(&model),
            SemiringKind::Log => info::<LogWeight>(&model),
        },
        Opts::Print { model } => match semiring_of(&model)? {
            SemiringKind::Tropical => print::<TropicalWeight>(&model),
            SemiringKind::Log => print::<LogWeight>(&model),
        },
        Opts::Arcsort {
            model,
            output,
            olabel,
        } => match semiring_of(&model)? {
            SemiringKind::Tropical => arcsort::<TropicalWeight>(&model, &output, olabel),
            SemiringKind::Log => arcsort::<LogWeight>(&model, &output, olabel),
        },
        Opts::Compose {
            left,
            right,
            output,
        } => {
            let kind = semiring_of(&left)?;
            if kind != semiring_of(&right)? {
                bail!("cannot compose models over different semirings");
            }
            match kind {
                SemiringKind::Tropical => {
                    compose_models::<TropicalWeight>(&left, &right, &output)
                }
                SemiringKind::Log => compose_models::<LogWeight>(&left, &right, &output),
            }
        }
        Opts::Connect { model, output } => match semiring_of(&model)? {
            SemiringKind::Tropical => connect_model::<TropicalWeight>(&model, &output),
            SemiringKind::Log => connect_model::<LogWeight>(&model, &output),
        },
        Opts::Project {
            model,
            output,
            output_side,
        } => match semiring_of(&model)? {
            SemiringKind::Tropical => {
                project_model::<TropicalWeight>(&model, &output, output_side)
            }
            SemiringKind::Log => project_model::<LogWeight>(&model, &output, output_side),
        },
        Opts::Shortest { model, n, json } => match semiring_of(&model)? {
            SemiringKind::Tropical => shortest::<TropicalWeight>(&model, n, json),
            SemiringKind::Log => shortest::<LogWeight>(&model, n, json),
        },
    }
}
