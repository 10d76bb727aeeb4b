//! Dual-vector individual for the cultural search.
//!
//! # Encoding
//!
//! - **OSV** (Operation Sequence Vector): job positions in draw order.
//!   The k-th occurrence of job J stands for J's k-th task, so any
//!   permutation preserves each job's internal order.
//! - **MAV** (Machine Assignment Vector): one machine per task, indexed
//!   by the task's flat position (jobs in input order, tasks in chain order).
//!
//! Decoding commits tasks in OSV order, each at the earliest slot on its
//! machine after the previous task of its job has finished. Every decoded
//! timeline is therefore feasible.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;

use super::belief::BeliefSpace;
use crate::error::Result;
use crate::models::{MachineId, ProblemModel, Time, Timeline};
use crate::validation::validate_job_order;

/// Maps `(job position, task offset)` to a flat task index and back.
#[derive(Debug, Clone)]
pub(crate) struct TaskLayout {
    offsets: Vec<usize>,
    job_of: Vec<usize>,
}

impl TaskLayout {
    pub fn new(problem: &ProblemModel) -> Self {
        let mut offsets = Vec::with_capacity(problem.jobs().len());
        let mut job_of = Vec::with_capacity(problem.task_count());
        for (pos, job) in problem.jobs().iter().enumerate() {
            offsets.push(job_of.len());
            job_of.extend(std::iter::repeat(pos).take(job.task_count()));
        }
        Self { offsets, job_of }
    }

    #[inline]
    pub fn flat(&self, job: usize, offset: usize) -> usize {
        self.offsets[job] + offset
    }

    /// Job position owning a flat task index.
    #[inline]
    pub fn job_of(&self, flat: usize) -> usize {
        self.job_of[flat]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.job_of.len()
    }
}

/// What a nudge did to an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NudgeOutcome {
    /// A task moved to the least-loaded machine.
    Applied,
    /// No move passed the feasibility gate (or loads were already level).
    Rejected,
}

/// One member of the population: encoding, decoded timeline and fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    osv: Vec<usize>,
    mav: Vec<MachineId>,
    timeline: Timeline,
    fitness: Time,
}

impl Individual {
    /// Random draw order and random machine per task.
    pub(crate) fn random<R: Rng>(
        problem: &ProblemModel,
        layout: &TaskLayout,
        rng: &mut R,
    ) -> Result<Self> {
        let mut osv: Vec<usize> = (0..layout.len()).map(|flat| layout.job_of(flat)).collect();
        osv.shuffle(rng);
        let mav = (0..layout.len())
            .map(|_| MachineId::new(rng.random_range(0..problem.machine_count())))
            .collect();
        Self::from_parts(problem, layout, osv, mav)
    }

    /// Builds an individual from explicit vectors.
    pub(crate) fn from_parts(
        problem: &ProblemModel,
        layout: &TaskLayout,
        osv: Vec<usize>,
        mav: Vec<MachineId>,
    ) -> Result<Self> {
        let timeline = decode(problem, layout, &osv, &mav)?;
        let fitness = timeline.makespan();
        Ok(Self {
            osv,
            mav,
            timeline,
            fitness,
        })
    }

    /// Makespan of the decoded timeline (lower is better).
    #[inline]
    pub fn fitness(&self) -> Time {
        self.fitness
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Machine assigned to a flat task index.
    #[inline]
    pub(crate) fn machine_of(&self, flat: usize) -> MachineId {
        self.mav[flat]
    }

    /// Moves one task from the most-loaded to the least-loaded machine.
    ///
    /// Candidates are the tasks on the most-loaded machine, tried in order of
    /// their job's affinity for the target machine (ties in random order).
    /// The first candidate whose re-decoded timeline passes the job-order
    /// check is kept; fitness is recomputed.
    pub(crate) fn nudge<R: Rng>(
        &mut self,
        problem: &ProblemModel,
        layout: &TaskLayout,
        belief: &BeliefSpace,
        rng: &mut R,
    ) -> Result<NudgeOutcome> {
        let machine_count = self.timeline.machine_count();
        let loads: Vec<Time> = MachineId::all(machine_count)
            .map(|m| self.timeline.busy_time(m))
            .collect();
        let (Some(over), Some(under)) = (most_loaded(&loads), least_loaded(&loads)) else {
            return Ok(NudgeOutcome::Rejected);
        };
        if loads[over.index()] == loads[under.index()] {
            return Ok(NudgeOutcome::Rejected);
        }

        let mut candidates: Vec<usize> = (0..layout.len())
            .filter(|&flat| self.mav[flat] == over)
            .collect();
        candidates.shuffle(rng);
        candidates.sort_by_key(|&flat| Reverse(belief.affinity(layout.job_of(flat), under)));

        for flat in candidates {
            let mut mav = self.mav.clone();
            mav[flat] = under;
            let Ok(timeline) = decode(problem, layout, &self.osv, &mav) else {
                continue;
            };
            if timeline.len() != problem.task_count() || validate_job_order(&timeline).is_err() {
                continue;
            }
            self.fitness = timeline.makespan();
            self.timeline = timeline;
            self.mav = mav;
            return Ok(NudgeOutcome::Applied);
        }

        Ok(NudgeOutcome::Rejected)
    }
}

/// Highest busy time, ties by lowest machine ID.
fn most_loaded(loads: &[Time]) -> Option<MachineId> {
    loads
        .iter()
        .enumerate()
        .max_by_key(|&(i, &load)| (load, Reverse(i)))
        .map(|(i, _)| MachineId::new(i))
}

/// Lowest busy time, ties by lowest machine ID.
fn least_loaded(loads: &[Time]) -> Option<MachineId> {
    loads
        .iter()
        .enumerate()
        .min_by_key(|&(i, &load)| (load, i))
        .map(|(i, _)| MachineId::new(i))
}

/// Commits tasks in OSV order at their earliest feasible slot.
fn decode(
    problem: &ProblemModel,
    layout: &TaskLayout,
    osv: &[usize],
    mav: &[MachineId],
) -> Result<Timeline> {
    let jobs = problem.jobs();
    let mut timeline = Timeline::new(problem.machine_count());
    let mut next = vec![0usize; jobs.len()];
    let mut ready: Vec<Time> = vec![0; jobs.len()];

    for &job in osv {
        let offset = next[job];
        let task = &jobs[job].tasks[offset];
        let machine = mav[layout.flat(job, offset)];
        let start = timeline.earliest_start(machine, ready[job], task.duration);
        let entry = timeline.commit(task, machine, start)?;
        ready[job] = entry.end_time;
        next[job] += 1;
    }

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;
    use crate::validation::validate_timeline;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn m(i: usize) -> MachineId {
        MachineId::new(i)
    }

    fn problem() -> ProblemModel {
        ProblemModel::build(
            2,
            vec![
                Job::new(1).with_tasks([4, 2]),
                Job::new(2).with_tasks([3]),
                Job::new(3).with_tasks([5, 1]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_layout() {
        let problem = problem();
        let layout = TaskLayout::new(&problem);
        assert_eq!(layout.len(), 5);
        assert_eq!(layout.flat(2, 1), 4);
        assert_eq!(layout.job_of(2), 1);
        assert_eq!(layout.job_of(3), 2);
    }

    #[test]
    fn test_random_individual_is_feasible() {
        let problem = problem();
        let layout = TaskLayout::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let ind = Individual::random(&problem, &layout, &mut rng).unwrap();
            assert!(validate_timeline(&problem, ind.timeline()).is_ok());
            assert_eq!(ind.fitness(), ind.timeline().makespan());

            let mut osv = ind.osv.clone();
            osv.sort_unstable();
            assert_eq!(osv, vec![0, 0, 1, 2, 2]);
        }
    }

    #[test]
    fn test_decode_follows_draw_order() {
        let problem = problem();
        let layout = TaskLayout::new(&problem);
        // Job 3 first on M1, then job 1's chain on M1, job 2 on M2.
        let osv = vec![2, 0, 1, 0, 2];
        let mav = vec![m(0), m(0), m(1), m(0), m(1)];
        let ind = Individual::from_parts(&problem, &layout, osv, mav).unwrap();

        let tl = ind.timeline();
        assert_eq!(tl.entry_for(3, 1).map(|e| e.start_time), Some(0));
        assert_eq!(tl.entry_for(1, 1).map(|e| e.start_time), Some(5));
        assert_eq!(tl.entry_for(1, 2).map(|e| e.start_time), Some(9));
        assert_eq!(tl.entry_for(2, 1).map(|e| e.start_time), Some(0));
        // Waits for job 3's first task, not for M2.
        assert_eq!(tl.entry_for(3, 2).map(|e| e.start_time), Some(5));
        assert_eq!(ind.fitness(), 11);
    }

    #[test]
    fn test_nudge_moves_task_to_least_loaded() {
        let problem = problem();
        let layout = TaskLayout::new(&problem);
        let osv = vec![0, 0, 1, 2, 2];
        let mav = vec![m(0); 5];
        let mut ind = Individual::from_parts(&problem, &layout, osv, mav).unwrap();
        assert_eq!(ind.fitness(), 15);

        let belief = BeliefSpace::new(3, 2);
        let mut rng = SmallRng::seed_from_u64(1);
        let outcome = ind.nudge(&problem, &layout, &belief, &mut rng).unwrap();

        assert_eq!(outcome, NudgeOutcome::Applied);
        let moved = (0..layout.len()).filter(|&f| ind.machine_of(f) == m(1)).count();
        assert_eq!(moved, 1);
        // Moving the final task of job 3 keeps 15; every other move shortens.
        assert!(ind.fitness() <= 15);
        assert_eq!(ind.fitness(), ind.timeline().makespan());
        assert!(validate_timeline(&problem, ind.timeline()).is_ok());
    }

    #[test]
    fn test_nudge_prefers_affine_job() {
        let problem = problem();
        let layout = TaskLayout::new(&problem);
        let mut belief = BeliefSpace::new(3, 2);
        belief.set_affinity(1, m(1), 5);

        for seed in 0..5 {
            let mav = vec![m(0); 5];
            let mut ind =
                Individual::from_parts(&problem, &layout, vec![0, 0, 1, 2, 2], mav).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed);
            ind.nudge(&problem, &layout, &belief, &mut rng).unwrap();

            // Job 2 (position 1) has one task at flat index 2.
            assert_eq!(ind.machine_of(2), m(1));
            assert_eq!(ind.fitness(), 12);
        }
    }

    #[test]
    fn test_nudge_rejected_when_balanced() {
        let problem = ProblemModel::build(
            2,
            vec![Job::new(1).with_task(4), Job::new(2).with_task(4)],
        )
        .unwrap();
        let layout = TaskLayout::new(&problem);
        let mut ind =
            Individual::from_parts(&problem, &layout, vec![0, 1], vec![m(0), m(1)]).unwrap();

        let belief = BeliefSpace::new(2, 2);
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = ind.nudge(&problem, &layout, &belief, &mut rng).unwrap();
        assert_eq!(outcome, NudgeOutcome::Rejected);
        assert_eq!(ind.fitness(), 4);
    }

    #[test]
    fn test_load_extremes_tie_to_lowest_id() {
        assert_eq!(most_loaded(&[5, 7, 7]), Some(m(1)));
        assert_eq!(least_loaded(&[3, 1, 1]), Some(m(1)));
        assert_eq!(most_loaded(&[]), None);
    }
}
