use bitevo_engine::{Chromosome, decode};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DecodeArg {
    /// Bit strings such as `0011000`; the first gene is the sign
    #[arg(required = true)]
    bits: Vec<Chromosome>,
}

pub(crate) fn run(arg: &DecodeArg) {
    for chromosome in &arg.bits {
        println!("{chromosome}\t{}", decode(chromosome));
    }
}
