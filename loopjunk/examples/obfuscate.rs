use loopjunk::obfuscate::{ObfuscationConfig, obfuscate_writes};
use rand::{SeedableRng as _, rngs::StdRng};

fn main() {
    let mut rng = StdRng::seed_from_u64(0);
    // Variables starting with 'g' are junk, everything else is real
    // state. Change the seed to get different identities.
    let code = "\
int x = 10;
int g1;
int g2;
int g3;
while (x > 0) {
    x = x - 1;
    g1 = g1 + 1;
}
";
    let cfg = ObfuscationConfig::default();
    println!("{}", obfuscate_writes(code, &cfg, &mut rng));
}
