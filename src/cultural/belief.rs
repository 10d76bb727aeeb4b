//! Belief space: knowledge extracted from the population.
//!
//! # Components
//!
//! - **Situational**: the best individual ever observed. Never worsens.
//! - **Normative**: statistics of the current elite (average fitness,
//!   average busy load per machine, and how often each job's tasks sit on
//!   each machine). Rebuilt every generation.
//!
//! # Reference
//! Reynolds (1994), "An Introduction to Cultural Algorithms"

use crate::models::{MachineId, Time, Timeline};

use super::individual::{Individual, TaskLayout};

/// Best timeline observed so far.
#[derive(Debug, Clone)]
pub struct Situational {
    pub timeline: Timeline,
    pub fitness: Time,
}

/// Elite statistics of the latest generation.
#[derive(Debug, Clone, Default)]
pub struct Normative {
    pub average_fitness: f64,
    /// Average busy time per machine, indexed by machine.
    pub average_load: Vec<f64>,
    /// `affinity[job][machine]`: elite tasks of the job placed on the machine.
    pub affinity: Vec<Vec<u64>>,
    pub sample_size: usize,
}

/// Situational and normative knowledge shared by all nudges of a generation.
#[derive(Debug, Clone)]
pub struct BeliefSpace {
    situational: Option<Situational>,
    normative: Normative,
}

impl BeliefSpace {
    /// Creates an empty belief space.
    pub fn new(job_count: usize, machine_count: usize) -> Self {
        Self {
            situational: None,
            normative: Normative {
                average_fitness: 0.0,
                average_load: vec![0.0; machine_count],
                affinity: vec![vec![0; machine_count]; job_count],
                sample_size: 0,
            },
        }
    }

    pub fn situational(&self) -> Option<&Situational> {
        self.situational.as_ref()
    }

    pub fn normative(&self) -> &Normative {
        &self.normative
    }

    /// Fitness of the best individual ever seen.
    pub fn best_fitness(&self) -> Option<Time> {
        self.situational.as_ref().map(|s| s.fitness)
    }

    /// Affinity count of a job position for a machine.
    #[inline]
    pub fn affinity(&self, job: usize, machine: MachineId) -> u64 {
        self.normative
            .affinity
            .get(job)
            .and_then(|row| row.get(machine.index()))
            .copied()
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn set_affinity(&mut self, job: usize, machine: MachineId, count: u64) {
        self.normative.affinity[job][machine.index()] = count;
    }

    /// Folds a population into the belief space.
    ///
    /// The situational entry is replaced only by a strictly better
    /// individual. The normative part is rebuilt from the best
    /// `ceil(len * elite_fraction)` individuals (at least one), ranked by
    /// fitness and then by position.
    pub(crate) fn update(
        &mut self,
        population: &[Individual],
        layout: &TaskLayout,
        elite_fraction: f64,
    ) {
        if population.is_empty() {
            return;
        }

        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by_key(|&i| (population[i].fitness(), i));

        let best = &population[ranked[0]];
        let improves = match self.best_fitness() {
            None => true,
            Some(fitness) => best.fitness() < fitness,
        };
        if improves {
            self.situational = Some(Situational {
                timeline: best.timeline().clone(),
                fitness: best.fitness(),
            });
        }

        let elite = ((population.len() as f64 * elite_fraction).ceil() as usize)
            .clamp(1, population.len());
        let machine_count = self.normative.average_load.len();
        let job_count = self.normative.affinity.len();

        let mut fitness_sum = 0.0;
        let mut load_sum = vec![0.0; machine_count];
        let mut affinity = vec![vec![0u64; machine_count]; job_count];

        for &i in &ranked[..elite] {
            let ind = &population[i];
            fitness_sum += ind.fitness() as f64;
            for machine in MachineId::all(machine_count) {
                load_sum[machine.index()] += ind.timeline().busy_time(machine) as f64;
            }
            for flat in 0..layout.len() {
                let machine = ind.machine_of(flat);
                affinity[layout.job_of(flat)][machine.index()] += 1;
            }
        }

        let n = elite as f64;
        self.normative = Normative {
            average_fitness: fitness_sum / n,
            average_load: load_sum.into_iter().map(|l| l / n).collect(),
            affinity,
            sample_size: elite,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, ProblemModel};

    fn m(i: usize) -> MachineId {
        MachineId::new(i)
    }

    fn setup() -> (ProblemModel, TaskLayout) {
        let problem = ProblemModel::build(
            2,
            vec![Job::new(1).with_tasks([4, 2]), Job::new(2).with_task(3)],
        )
        .unwrap();
        let layout = TaskLayout::new(&problem);
        (problem, layout)
    }

    fn individual(problem: &ProblemModel, layout: &TaskLayout, mav: [usize; 3]) -> Individual {
        let mav = mav.into_iter().map(MachineId::new).collect();
        Individual::from_parts(problem, layout, vec![0, 0, 1], mav).unwrap()
    }

    #[test]
    fn test_empty_belief() {
        let belief = BeliefSpace::new(2, 3);
        assert!(belief.situational().is_none());
        assert_eq!(belief.best_fitness(), None);
        assert_eq!(belief.affinity(1, m(2)), 0);
        assert_eq!(belief.affinity(9, m(9)), 0);
    }

    #[test]
    fn test_update_tracks_best_and_elite() {
        let (problem, layout) = setup();
        // Fitness: 9 (all on M1), 6 (job 2 on M2), 7 (job 1 split).
        let population = vec![
            individual(&problem, &layout, [0, 0, 0]),
            individual(&problem, &layout, [0, 0, 1]),
            individual(&problem, &layout, [0, 1, 0]),
        ];
        assert_eq!(population[1].fitness(), 6);

        let mut belief = BeliefSpace::new(2, 2);
        belief.update(&population, &layout, 0.25);

        assert_eq!(belief.best_fitness(), Some(6));
        let normative = belief.normative();
        assert_eq!(normative.sample_size, 1);
        assert_eq!(normative.average_fitness, 6.0);
        assert_eq!(normative.average_load, vec![6.0, 3.0]);
        assert_eq!(normative.affinity, vec![vec![2, 0], vec![0, 1]]);
    }

    #[test]
    fn test_elite_fraction_rounds_up() {
        let (problem, layout) = setup();
        let population = vec![
            individual(&problem, &layout, [0, 0, 0]),
            individual(&problem, &layout, [0, 0, 1]),
            individual(&problem, &layout, [0, 0, 0]),
        ];
        let mut belief = BeliefSpace::new(2, 2);
        belief.update(&population, &layout, 0.5);

        // ceil(1.5) = 2: fitness 6 then the first 9.
        assert_eq!(belief.normative().sample_size, 2);
        assert_eq!(belief.normative().average_fitness, 7.5);
        assert_eq!(belief.affinity(1, m(0)), 1);
        assert_eq!(belief.affinity(1, m(1)), 1);
    }

    #[test]
    fn test_situational_never_worsens() {
        let (problem, layout) = setup();
        let good = vec![individual(&problem, &layout, [0, 0, 1])];
        let bad = vec![individual(&problem, &layout, [0, 0, 0])];

        let mut belief = BeliefSpace::new(2, 2);
        belief.update(&good, &layout, 0.25);
        belief.update(&bad, &layout, 0.25);

        assert_eq!(belief.best_fitness(), Some(6));
        assert_eq!(belief.situational().map(|s| s.timeline.makespan()), Some(6));
        // Normative follows the latest population.
        assert_eq!(belief.normative().average_fitness, 9.0);
    }
}
